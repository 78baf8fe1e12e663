use glam::Vec2;

use super::easing::Easing;
use crate::color::Color;
use crate::renderer::{Paint, Rect, Surface, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Holding,
    FadeOut,
}

/// Banner that bounces in, holds, then fades out.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub color: Color,
    /// Elapsed ms.
    pub age: f32,
    pub duration: f32,
    pub bounce_in: f32,
    pub fade_out: f32,
}

impl Notification {
    pub const WIDTH: f32 = 320.0;
    pub const HEIGHT: f32 = 64.0;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            icon: None,
            color: Color::GOLD,
            age: 0.0,
            duration: 3000.0,
            bounce_in: 500.0,
            fade_out: 500.0,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_timing(mut self, duration: f32, bounce_in: f32, fade_out: f32) -> Self {
        self.duration = duration;
        self.bounce_in = bounce_in;
        self.fade_out = fade_out;
        self
    }

    pub fn phase(&self) -> Phase {
        if self.age < self.bounce_in {
            Phase::Spawning
        } else if self.age <= self.duration - self.fade_out {
            Phase::Holding
        } else {
            Phase::FadeOut
        }
    }

    pub fn scale(&self) -> f32 {
        match self.phase() {
            Phase::Spawning if self.bounce_in > 0.0 => Easing::BounceOut.apply(self.age / self.bounce_in),
            _ => 1.0,
        }
    }

    pub fn alpha(&self) -> f32 {
        match self.phase() {
            Phase::FadeOut if self.fade_out > 0.0 => {
                ((self.duration - self.age) / self.fade_out).clamp(0.0, 1.0)
            }
            Phase::FadeOut => 0.0,
            _ => 1.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.duration
    }

    /// Draw centered on `anchor`.
    pub fn draw(&self, surface: &mut dyn Surface, anchor: Vec2) {
        let scale = self.scale();
        if scale <= 0.0 {
            return;
        }
        surface.save();
        surface.translate(anchor);
        surface.scale(Vec2::splat(scale));
        surface.set_alpha(self.alpha());

        let panel = Rect::centered(Vec2::ZERO, Vec2::new(Self::WIDTH, Self::HEIGHT));
        surface.fill_rounded_rect(panel, 12.0, &Paint::from(Color::rgb(0.05, 0.05, 0.12).with_alpha(0.85)));
        surface.set_glow(10.0, self.color);
        surface.stroke_rect(panel, 2.0, self.color);
        surface.set_glow(0.0, self.color);

        let mut text_x = 0.0;
        if let Some(icon) = &self.icon {
            surface.fill_text(icon, Vec2::new(-Self::WIDTH * 0.5 + 32.0, 8.0), &TextStyle::new(28.0, Color::WHITE));
            text_x = 20.0;
        }
        let title_y = if self.subtitle.is_some() { -6.0 } else { 6.0 };
        surface.fill_text(
            &self.title,
            Vec2::new(text_x, title_y),
            &TextStyle::new(22.0, self.color).bold(),
        );
        if let Some(sub) = &self.subtitle {
            surface.fill_text(sub, Vec2::new(text_x, 18.0), &TextStyle::new(14.0, Color::WHITE.fade(0.8)));
        }
        surface.restore();
    }
}
