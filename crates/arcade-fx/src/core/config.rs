use serde::{Deserialize, Serialize};

use crate::particles::ParticleEngine;
use crate::shake::ScreenShake;

/// Construction-time settings for the compositor.
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    /// Drawing surface width in px (default: 800).
    pub width: f32,
    /// Drawing surface height in px (default: 600).
    pub height: f32,
    /// Particle pool cap (default: 500).
    pub max_particles: usize,
    /// Seed every stochastic subsystem derives its stream from (default: 42).
    pub seed: u64,
    /// Trauma removed per second (default: 1.5).
    pub shake_decay: f32,
    /// Shake offset in px at full trauma (default: 20).
    pub shake_max_offset: f32,
    /// Shake rotation in radians at full trauma (default: 0.05).
    pub shake_max_rotation: f32,
    /// Player speed above which the background draws speed lines (default: 5).
    pub speed_line_threshold: f32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            max_particles: ParticleEngine::DEFAULT_MAX_PARTICLES,
            seed: 42,
            shake_decay: ScreenShake::DEFAULT_DECAY,
            shake_max_offset: ScreenShake::DEFAULT_MAX_OFFSET,
            shake_max_rotation: ScreenShake::DEFAULT_MAX_ROTATION,
            speed_line_threshold: 5.0,
        }
    }
}

impl FxConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = FxConfig::from_json(r#"{"width": 1024, "maxParticles": 64}"#).unwrap();
        assert_eq!(cfg.width, 1024.0);
        assert_eq!(cfg.height, 600.0);
        assert_eq!(cfg.max_particles, 64);
        assert_eq!(cfg.seed, 42);
        assert!((cfg.shake_decay - 1.5).abs() < 1e-6);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(FxConfig::from_json("{}").unwrap(), FxConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(FxConfig::from_json("{\"width\": \"wide\"}").is_err());
        assert!(FxConfig::from_json("not json").is_err());
    }
}
