use glam::Vec2;

use crate::color::Color;
use crate::renderer::{Surface, TextStyle};

/// Remaining life over which floating text fades out.
pub const FADE_MS: f32 = 500.0;

/// Score popups and similar labels that rise and fade.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub pos: Vec2,
    /// Upward drift in px per second.
    pub speed: f32,
    pub text: String,
    pub color: Color,
    pub size: f32,
    /// Remaining life in ms.
    pub life: f32,
}

impl FloatingText {
    pub const DEFAULT_LIFE: f32 = 1500.0;

    pub fn new(pos: Vec2, text: impl Into<String>, color: Color) -> Self {
        Self {
            pos,
            speed: 60.0,
            text: text.into(),
            color,
            size: 20.0,
            life: Self::DEFAULT_LIFE,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_life(mut self, life_ms: f32) -> Self {
        self.life = life_ms;
        self
    }

    pub fn with_speed(mut self, px_per_second: f32) -> Self {
        self.speed = px_per_second;
        self
    }

    /// `min(1, life / 500ms)`, never negative.
    pub fn alpha(&self) -> f32 {
        (self.life / FADE_MS).clamp(0.0, 1.0)
    }

    /// Returns false once life is exhausted.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.pos.y -= self.speed * dt / 1000.0;
        self.life -= dt;
        self.life > 0.0
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let style = TextStyle::new(self.size, self.color.fade(self.alpha())).bold();
        surface.save();
        surface.set_glow(6.0, self.color);
        surface.fill_text(&self.text, self.pos, &style);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drifts_up_at_constant_speed() {
        let mut t = FloatingText::new(Vec2::new(0.0, 100.0), "+10", Color::GOLD).with_speed(50.0);
        t.tick(200.0);
        t.tick(200.0);
        assert!((t.pos.y - 80.0).abs() < 1e-4);
    }

    #[test]
    fn alpha_fades_over_last_half_second() {
        let mut t = FloatingText::new(Vec2::ZERO, "x", Color::WHITE).with_life(1000.0);
        assert_eq!(t.alpha(), 1.0);
        t.tick(750.0);
        assert!((t.alpha() - 0.5).abs() < 1e-5);
        assert!(!t.tick(250.0));
        assert_eq!(t.alpha(), 0.0);
    }
}
