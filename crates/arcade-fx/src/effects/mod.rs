//! Library of one-shot powerup and milestone effects.
//!
//! Triggers push an [`EffectInstance`] onto a shared list. Every tick the
//! library ages each instance, lets its kind animate, then drops those whose
//! age reached their duration. Drawing follows insertion order.

mod kind;
mod lightning;

pub use kind::{EffectInstance, EffectKind, Orbit, Spark, Streak};
pub use lightning::Bolt;

use glam::Vec2;

use crate::color::Color;
use crate::core::rng::Rng;
use crate::renderer::Surface;

pub const SHIELD_MS: f32 = 1000.0;
pub const SPEED_BURST_MS: f32 = 600.0;
pub const DOUBLE_POINTS_MS: f32 = 1200.0;
pub const MAGNET_MS: f32 = 1500.0;
pub const SLOW_TIME_MS: f32 = 1500.0;
pub const COMBO_MS: f32 = 1500.0;
pub const FIREWORK_MS: f32 = 2200.0;

pub struct EffectLibrary {
    effects: Vec<EffectInstance>,
    pub rng: Rng,
}

impl EffectLibrary {
    pub fn new(seed: u64) -> Self {
        Self {
            effects: Vec::new(),
            rng: Rng::new(seed),
        }
    }

    pub fn shield(&mut self, pos: Vec2, color: Color) {
        self.push(pos, color, SHIELD_MS, EffectKind::ShieldRing { spin: 0.0 });
    }

    pub fn speed_burst(&mut self, pos: Vec2, color: Color) {
        let kind = EffectKind::speed_burst(&mut self.rng);
        self.push(pos, color, SPEED_BURST_MS, kind);
    }

    pub fn double_points(&mut self, pos: Vec2, color: Color) {
        self.push(pos, color, DOUBLE_POINTS_MS, EffectKind::double_points());
    }

    pub fn magnet(&mut self, pos: Vec2, color: Color) {
        self.push(pos, color, MAGNET_MS, EffectKind::magnet());
    }

    pub fn slow_time(&mut self, pos: Vec2, color: Color) {
        self.push(pos, color, SLOW_TIME_MS, EffectKind::SlowTimeWave { hand: 0.0 });
    }

    /// Label and spark ring; the color escalates with the combo count.
    pub fn combo_milestone(&mut self, pos: Vec2, combo: u32) {
        let color = combo_color(combo);
        let kind = EffectKind::combo(pos, combo, color, &mut self.rng);
        self.push(pos, color, COMBO_MS, kind);
    }

    pub fn firework(&mut self, pos: Vec2, palette: &[Color]) {
        let color = palette.first().copied().unwrap_or(Color::GOLD);
        self.push(pos, color, FIREWORK_MS, EffectKind::firework(pos, palette));
    }

    fn push(&mut self, pos: Vec2, color: Color, duration: f32, kind: EffectKind) {
        log::debug!("effect {} at ({:.0}, {:.0})", kind.name(), pos.x, pos.y);
        self.effects.push(EffectInstance::new(pos, color, duration, kind));
    }

    pub fn update(&mut self, dt: f32) {
        for fx in &mut self.effects {
            fx.age += dt;
            fx.update(dt, &mut self.rng);
        }
        self.effects.retain(EffectInstance::is_alive);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for fx in &self.effects {
            fx.draw(surface);
        }
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Milestone color by combo tier.
pub fn combo_color(combo: u32) -> Color {
    match combo {
        50.. => Color::MAGENTA,
        25..=49 => Color::ORANGE,
        10..=24 => Color::GOLD,
        _ => Color::YELLOW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};

    #[test]
    fn instances_removed_when_age_reaches_duration() {
        let mut lib = EffectLibrary::new(1);
        lib.speed_burst(Vec2::ZERO, Color::YELLOW);
        lib.shield(Vec2::ZERO, Color::CYAN);
        lib.update(SPEED_BURST_MS - 1.0);
        assert_eq!(lib.len(), 2);
        lib.update(1.0);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.effects()[0].kind.name(), "shieldRing");
        lib.update(SHIELD_MS);
        assert!(lib.is_empty());
    }

    #[test]
    fn container_ages_before_delegating() {
        let mut lib = EffectLibrary::new(1);
        lib.slow_time(Vec2::ZERO, Color::MINT);
        lib.update(100.0);
        assert_eq!(lib.effects()[0].age, 100.0);
        match lib.effects()[0].kind {
            EffectKind::SlowTimeWave { hand } => assert!(hand > 0.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn draws_in_insertion_order() {
        let mut lib = EffectLibrary::new(1);
        lib.combo_milestone(Vec2::ZERO, 5);
        lib.double_points(Vec2::ZERO, Color::MAGENTA);
        lib.update(200.0);
        let mut list = DrawList::new(100.0, 100.0);
        lib.draw(&mut list);
        let texts = list.texts();
        assert_eq!(texts, vec!["COMBO x5", "2X"]);
        assert_eq!(list.depth(), 0);
        assert!(list.commands().iter().any(DrawCommand::is_paint));
    }

    #[test]
    fn combo_tiers() {
        assert_eq!(combo_color(3), Color::YELLOW);
        assert_eq!(combo_color(10), Color::GOLD);
        assert_eq!(combo_color(30), Color::ORANGE);
        assert_eq!(combo_color(99), Color::MAGENTA);
    }

    #[test]
    fn zero_duration_effect_disappears_on_next_update() {
        let mut lib = EffectLibrary::new(1);
        lib.push(Vec2::ZERO, Color::WHITE, 0.0, EffectKind::ShieldRing { spin: 0.0 });
        lib.update(0.0);
        assert!(lib.is_empty());
    }
}
