//! Curated compound effects built from `emit`, `create_emitter` and
//! scheduled bursts.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::{EmitConfig, EmitterConfig, ParticleEngine, ParticleShape};
use crate::color::Color;

/// Delay before a firework's secondary cascade.
pub const FIREWORK_CASCADE_DELAY: f32 = 400.0;
/// Number of secondary bursts in a firework cascade.
pub const FIREWORK_CASCADE_BURSTS: usize = 8;
/// Stagger between single particles of a spiral.
pub const SPIRAL_STEP_MS: f32 = 30.0;
/// Stagger between letters of a text sparkle.
pub const TEXT_STEP_MS: f32 = 40.0;
const TEXT_CHAR_WIDTH: f32 = 12.0;
const SMOKE: Color = Color::new(0.55, 0.55, 0.6, 0.5);

impl ParticleEngine {
    /// Core flash, line sparks, bouncing debris, a shockwave ring, then smoke.
    pub fn explosion(&mut self, pos: Vec2, color: Color, intensity: f32) {
        let count = |base: f32| (base * intensity).round().max(1.0) as usize;

        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(count(20.0))
                .with_palette(&[color, Color::WHITE, Color::ORANGE])
                .with_speed(8.0 * intensity)
                .with_size(5.0)
                .with_life(0.8)
                .with_friction(0.95)
                .with_glow(15.0),
        );
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(count(12.0))
                .with_color(Color::YELLOW)
                .with_shape(ParticleShape::Line)
                .with_speed(12.0 * intensity)
                .with_size(2.0)
                .with_life(0.5)
                .with_gravity(0.1)
                .with_friction(0.96)
                .with_trail(5),
        );
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(count(8.0))
                .with_color(color)
                .with_shape(ParticleShape::Square)
                .with_speed(6.0)
                .with_size(3.0)
                .with_life(1.2)
                .with_gravity(0.2)
                .with_bounce()
                .with_rotation(0.0, 0.2),
        );
        self.shockwave(pos, color);
        self.emit_after(
            100.0,
            pos,
            EmitConfig::new()
                .with_count(count(10.0))
                .with_color(SMOKE)
                .with_speed(2.0)
                .with_size(8.0)
                .with_life(1.0)
                .with_gravity(-0.05)
                .with_friction(0.97),
        );
    }

    /// A single expanding ring.
    pub fn shockwave(&mut self, pos: Vec2, color: Color) {
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(1)
                .with_color(color)
                .with_shape(ParticleShape::Shockwave)
                .with_speed(0.0)
                .with_size(12.0)
                .with_life(0.6)
                .with_friction(1.0),
        );
    }

    /// Spinning stars and white sparkles, followed by a smaller glowing ring.
    pub fn collect_enhanced(&mut self, pos: Vec2, color: Color) {
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(12)
                .with_color(color)
                .with_shape(ParticleShape::Star)
                .with_speed(4.0)
                .with_size(6.0)
                .with_life(0.8)
                .with_rotation(0.0, 0.2)
                .with_glow(10.0),
        );
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(8)
                .with_color(Color::WHITE)
                .with_speed(2.0)
                .with_size(3.0)
                .with_life(0.5),
        );
        self.emit_after(
            150.0,
            pos,
            EmitConfig::new()
                .with_count(6)
                .with_color(color)
                .with_speed(6.0)
                .with_size(2.0)
                .with_life(0.4)
                .with_glow(8.0),
        );
    }

    /// Exhaust puffs opposite to `velocity`.
    pub fn trail_enhanced(&mut self, pos: Vec2, velocity: Vec2, color: Color) {
        let backwards = (-velocity).to_angle();
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(2)
                .with_color(color)
                .with_arc(backwards, 0.6)
                .with_speed(velocity.length() * 0.3 + 1.0)
                .with_size(3.0)
                .with_life(0.4)
                .with_friction(0.92)
                .with_glow(6.0),
        );
    }

    /// Rising motes around a powered-up entity for `duration_ms`.
    pub fn powerup_aura_enhanced(&mut self, pos: Vec2, color: Color, duration_ms: f32) {
        self.create_emitter(
            pos,
            EmitterConfig::new(
                20.0,
                duration_ms,
                EmitConfig::new()
                    .with_count(1)
                    .with_color(color)
                    .with_speed(1.5)
                    .with_size(3.0)
                    .with_life(0.6)
                    .with_gravity(-0.05)
                    .with_glow(8.0),
            ),
        );
    }

    /// Main burst, then a ring of secondary bursts after a fixed delay.
    pub fn firework(&mut self, pos: Vec2, colors: &[Color]) {
        let palette: Vec<Color> = if colors.is_empty() { vec![Color::WHITE] } else { colors.to_vec() };
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(30)
                .with_palette(&palette)
                .with_speed(7.0)
                .with_size(3.0)
                .with_life(1.2)
                .with_gravity(0.08)
                .with_friction(0.97)
                .with_trail(6)
                .with_glow(8.0),
        );
        for i in 0..FIREWORK_CASCADE_BURSTS {
            let angle = i as f32 * TAU / FIREWORK_CASCADE_BURSTS as f32;
            let at = pos + Vec2::from_angle(angle) * 60.0;
            self.emit_after(
                FIREWORK_CASCADE_DELAY,
                at,
                EmitConfig::new()
                    .with_count(8)
                    .with_color(palette[i % palette.len()])
                    .with_speed(3.0)
                    .with_size(2.0)
                    .with_life(0.7)
                    .with_gravity(0.05)
                    .with_glow(6.0),
            );
        }
    }

    /// Directional spray of line sparks plus a small ring.
    pub fn impact(&mut self, pos: Vec2, direction: f32, color: Color) {
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(10)
                .with_color(color)
                .with_shape(ParticleShape::Line)
                .with_arc(direction, FRAC_PI_2)
                .with_speed(6.0)
                .with_size(2.0)
                .with_life(0.3)
                .with_friction(0.9),
        );
        self.emit(
            pos,
            &EmitConfig::new()
                .with_count(1)
                .with_color(color)
                .with_shape(ParticleShape::Shockwave)
                .with_speed(0.0)
                .with_size(6.0)
                .with_life(0.3)
                .with_friction(1.0),
        );
    }

    /// Single particles released one at a time along an outward spiral.
    pub fn spiral(&mut self, pos: Vec2, color: Color, count: usize) {
        for i in 0..count {
            let angle = i as f32 * 0.5;
            let at = pos + Vec2::from_angle(angle) * (i as f32 * 3.0);
            self.emit_after(
                i as f32 * SPIRAL_STEP_MS,
                at,
                EmitConfig::new()
                    .with_count(1)
                    .with_color(color)
                    .with_arc(angle, 0.0)
                    .with_speed(2.0)
                    .with_size(3.0)
                    .with_life(0.8)
                    .with_glow(6.0),
            );
        }
    }

    /// Sparkles rising off each letter of `text`, left to right.
    pub fn text_particles(&mut self, pos: Vec2, text: &str, color: Color) {
        let len = text.chars().count() as f32;
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x = (i as f32 - (len - 1.0) * 0.5) * TEXT_CHAR_WIDTH;
            self.emit_after(
                i as f32 * TEXT_STEP_MS,
                pos + Vec2::new(x, 0.0),
                EmitConfig::new()
                    .with_count(4)
                    .with_color(color)
                    .with_speed(1.5)
                    .with_size(2.0)
                    .with_life(0.6)
                    .with_gravity(-0.03)
                    .with_glow(5.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ParticleEngine {
        ParticleEngine::new(2000, Vec2::new(800.0, 600.0), 1)
    }

    #[test]
    fn firework_cascade_fires_after_delay() {
        let mut e = engine();
        e.firework(Vec2::new(400.0, 300.0), &[Color::RED, Color::GOLD]);
        assert_eq!(e.particle_count(), 30);
        assert_eq!(e.pending_count(), FIREWORK_CASCADE_BURSTS);

        e.update(FIREWORK_CASCADE_DELAY - 1.0);
        assert_eq!(e.pending_count(), FIREWORK_CASCADE_BURSTS);
        e.update(1.0);
        assert_eq!(e.pending_count(), 0);
        assert_eq!(e.particle_count(), 30 + FIREWORK_CASCADE_BURSTS * 8);
    }

    #[test]
    fn spiral_staggers_single_particles() {
        let mut e = engine();
        e.spiral(Vec2::ZERO, Color::CYAN, 10);
        e.update(0.0);
        assert_eq!(e.particle_count(), 1);
        e.update(SPIRAL_STEP_MS);
        assert_eq!(e.particle_count(), 2);
        e.update(SPIRAL_STEP_MS * 20.0);
        assert_eq!(e.particle_count(), 10);
    }

    #[test]
    fn delayed_bursts_respect_pool_cap() {
        let mut e = ParticleEngine::new(40, Vec2::new(800.0, 600.0), 1);
        e.firework(Vec2::ZERO, &[Color::WHITE]);
        e.update(FIREWORK_CASCADE_DELAY);
        assert_eq!(e.particle_count(), 40);
    }

    #[test]
    fn impact_sprays_within_arc() {
        let mut e = engine();
        e.impact(Vec2::ZERO, 0.0, Color::RED);
        let lines: Vec<_> = e
            .particles()
            .iter()
            .filter(|p| p.shape == ParticleShape::Line)
            .collect();
        assert_eq!(lines.len(), 10);
        for p in lines {
            let a = p.velocity.to_angle();
            assert!(a.abs() <= FRAC_PI_2 / 2.0 + 1e-4, "angle {}", a);
        }
    }

    #[test]
    fn explosion_schedules_smoke() {
        let mut e = engine();
        e.explosion(Vec2::ZERO, Color::RED, 1.0);
        assert_eq!(e.particle_count(), 20 + 12 + 8 + 1);
        assert_eq!(e.pending_count(), 1);
    }

    #[test]
    fn aura_creates_emitter() {
        let mut e = engine();
        e.powerup_aura_enhanced(Vec2::ZERO, Color::MAGENTA, 300.0);
        assert_eq!(e.emitter_count(), 1);
        e.update(300.0);
        assert_eq!(e.emitter_count(), 0);
        assert_eq!(e.particle_count(), 6);
    }

    #[test]
    fn text_particles_skip_spaces() {
        let mut e = engine();
        e.text_particles(Vec2::ZERO, "A B", Color::WHITE);
        assert_eq!(e.pending_count(), 2);
    }

    #[test]
    fn trail_points_away_from_motion() {
        let mut e = engine();
        e.trail_enhanced(Vec2::ZERO, Vec2::new(10.0, 0.0), Color::WHITE);
        assert!(e.particles().iter().all(|p| p.velocity.x < 0.0));
    }
}
