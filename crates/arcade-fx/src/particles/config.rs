use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::particle::ParticleShape;
use crate::color::Color;
use crate::core::rng::Rng;

/// How particle colors are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticleColor {
    /// All particles use the same color.
    Fixed(Color),
    /// Pick randomly from a palette for each particle.
    Palette(Vec<Color>),
}

impl ParticleColor {
    pub fn pick(&self, rng: &mut Rng) -> Color {
        match self {
            Self::Fixed(c) => *c,
            Self::Palette(colors) => rng.pick(colors).copied().unwrap_or_default(),
        }
    }
}

impl Default for ParticleColor {
    fn default() -> Self {
        Self::Fixed(Color::WHITE)
    }
}

impl From<Color> for ParticleColor {
    fn from(color: Color) -> Self {
        Self::Fixed(color)
    }
}

/// Burst configuration for `ParticleEngine::emit`.
///
/// Every field has a default, so JSON configs only name what they change.
/// Values are not validated: a negative life yields particles that die on
/// their first update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitConfig {
    /// Particles per burst.
    pub count: usize,
    pub color: ParticleColor,
    /// Peak initial speed in px per tick; each particle gets 0.5–1.0× of it.
    pub speed: f32,
    /// Peak size in px; each particle gets 0.5–1.0× of it.
    pub size: f32,
    /// Lifetime in seconds.
    pub life: f32,
    /// Added to vertical velocity each tick.
    pub gravity: f32,
    /// Width of the emission arc in radians, centered on `direction`.
    pub spread: f32,
    /// Center of the emission arc in radians (0 = +x).
    pub direction: f32,
    pub shape: ParticleShape,
    pub trail: bool,
    pub trail_length: usize,
    /// Reflect off the bottom edge of the engine bounds.
    pub bounce: bool,
    /// Velocity multiplier applied each tick.
    pub friction: f32,
    /// Initial rotation in radians.
    pub rotation: f32,
    /// Rotation added each tick.
    pub rotation_speed: f32,
    pub glow: bool,
    pub glow_size: f32,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            count: 10,
            color: ParticleColor::default(),
            speed: 5.0,
            size: 4.0,
            life: 1.0,
            gravity: 0.0,
            spread: TAU,
            direction: 0.0,
            shape: ParticleShape::Circle,
            trail: false,
            trail_length: 10,
            bounce: false,
            friction: 0.98,
            rotation: 0.0,
            rotation_speed: 0.0,
            glow: false,
            glow_size: 10.0,
        }
    }
}

impl EmitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_color(mut self, color: impl Into<ParticleColor>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_palette(mut self, colors: &[Color]) -> Self {
        self.color = ParticleColor::Palette(colors.to_vec());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_life(mut self, life: f32) -> Self {
        self.life = life;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Emit within an arc of `spread` radians centered on `direction`.
    pub fn with_arc(mut self, direction: f32, spread: f32) -> Self {
        self.direction = direction;
        self.spread = spread;
        self
    }

    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_trail(mut self, length: usize) -> Self {
        self.trail = true;
        self.trail_length = length;
        self
    }

    pub fn with_bounce(mut self) -> Self {
        self.bounce = true;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_rotation(mut self, rotation: f32, rotation_speed: f32) -> Self {
        self.rotation = rotation;
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn with_glow(mut self, size: f32) -> Self {
        self.glow = true;
        self.glow_size = size;
        self
    }

    /// Pick one emission angle. Full circle when `spread >= TAU`, otherwise
    /// uniform within the symmetric arc around `direction`.
    pub(crate) fn sample_angle(&self, rng: &mut Rng) -> f32 {
        if self.spread >= TAU {
            rng.angle()
        } else {
            self.direction + (rng.next_f32() - 0.5) * self.spread
        }
    }
}

/// Continuous emission: `rate` bursts per second for `duration` ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterConfig {
    pub rate: f32,
    /// Lifetime in milliseconds.
    pub duration: f32,
    /// Template for each burst.
    pub particle: EmitConfig,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            rate: 30.0,
            duration: 1000.0,
            particle: EmitConfig::default().with_count(1),
        }
    }
}

impl EmitterConfig {
    pub fn new(rate: f32, duration: f32, particle: EmitConfig) -> Self {
        Self { rate, duration, particle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = EmitConfig::default();
        assert_eq!(c.count, 10);
        assert_eq!(c.spread, TAU);
        assert_eq!(c.friction, 0.98);
        assert!(!c.trail && !c.glow && !c.bounce);
    }

    #[test]
    fn builder_pattern() {
        let c = EmitConfig::new()
            .with_count(3)
            .with_speed(8.0)
            .with_trail(6)
            .with_glow(15.0)
            .with_shape(ParticleShape::Star);
        assert_eq!(c.count, 3);
        assert_eq!(c.speed, 8.0);
        assert!(c.trail && c.trail_length == 6);
        assert!(c.glow && c.glow_size == 15.0);
        assert_eq!(c.shape, ParticleShape::Star);
    }

    #[test]
    fn json_fields_merge_over_defaults() {
        let c: EmitConfig =
            serde_json::from_str(r##"{"count": 5, "color": "#ff0000", "shape": "star"}"##).unwrap();
        assert_eq!(c.count, 5);
        assert_eq!(c.color, ParticleColor::Fixed(Color::RED));
        assert_eq!(c.shape, ParticleShape::Star);
        assert_eq!(c.life, 1.0);
        assert_eq!(c.speed, 5.0);
    }

    #[test]
    fn palette_from_json() {
        let c: EmitConfig =
            serde_json::from_str(r##"{"color": ["#ff0000", "#00ff00"]}"##).unwrap();
        assert!(matches!(c.color, ParticleColor::Palette(ref p) if p.len() == 2));
    }

    #[test]
    fn arc_angles_stay_within_spread() {
        let c = EmitConfig::new().with_arc(1.0, 0.5);
        let mut rng = Rng::new(11);
        for _ in 0..200 {
            let a = c.sample_angle(&mut rng);
            assert!(a >= 0.75 && a <= 1.25, "angle {} outside arc", a);
        }
    }
}
