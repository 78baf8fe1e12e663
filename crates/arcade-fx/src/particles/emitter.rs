use glam::Vec2;

use super::config::{EmitConfig, EmitterConfig};

/// Short-lived continuous particle source.
///
/// Uses a fixed-step accumulator so a long frame emits every burst it owes
/// instead of drifting below the configured rate.
#[derive(Debug, Clone)]
pub struct Emitter {
    pub origin: Vec2,
    /// Bursts per second.
    pub rate: f32,
    /// Lifetime in milliseconds.
    pub duration: f32,
    /// Milliseconds since creation.
    pub age: f32,
    pub template: EmitConfig,
    accumulator: f32,
}

impl Emitter {
    /// Upper bound on bursts owed by a single tick.
    pub const MAX_BURSTS_PER_TICK: usize = 256;

    pub fn new(origin: Vec2, config: EmitterConfig) -> Self {
        Self {
            origin,
            rate: config.rate,
            duration: config.duration,
            age: 0.0,
            template: config.particle,
            accumulator: 0.0,
        }
    }

    /// Milliseconds between bursts, or `None` when the rate cannot emit.
    fn interval(&self) -> Option<f32> {
        let interval = 1000.0 / self.rate;
        (interval.is_finite() && interval > 0.0).then_some(interval)
    }

    /// Advance by `dt` ms. Returns the number of bursts owed this tick.
    pub fn tick(&mut self, dt: f32) -> usize {
        self.age += dt;
        let Some(interval) = self.interval() else {
            return 0;
        };
        self.accumulator += dt;
        let owed = (self.accumulator / interval).floor();
        if owed < 1.0 {
            return 0;
        }
        if owed > Self::MAX_BURSTS_PER_TICK as f32 {
            // Backlog past the cap is forgiven, not carried into later ticks.
            self.accumulator = 0.0;
            return Self::MAX_BURSTS_PER_TICK;
        }
        self.accumulator = (self.accumulator - owed * interval).max(0.0);
        owed as usize
    }

    pub fn is_finished(&self) -> bool {
        self.age >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(rate: f32, duration: f32) -> Emitter {
        Emitter::new(Vec2::ZERO, EmitterConfig::new(rate, duration, EmitConfig::new().with_count(1)))
    }

    #[test]
    fn accumulator_emits_on_interval() {
        let mut e = emitter(10.0, 1000.0);
        assert_eq!(e.tick(50.0), 0);
        assert_eq!(e.tick(50.0), 1);
    }

    #[test]
    fn long_frame_catches_up() {
        let mut e = emitter(20.0, 1000.0);
        // 250ms at 50ms per burst owes five bursts.
        assert_eq!(e.tick(250.0), 5);
    }

    #[test]
    fn variable_frames_match_total_rate() {
        let mut e = emitter(60.0, 10_000.0);
        let frames = [16.0, 33.0, 7.0, 50.0, 16.0, 16.0, 60.0];
        let total: usize = frames.iter().map(|&dt| e.tick(dt)).sum();
        let elapsed: f32 = frames.iter().sum();
        assert_eq!(total, (elapsed * 60.0 / 1000.0) as usize);
    }

    #[test]
    fn finishes_after_duration() {
        let mut e = emitter(10.0, 100.0);
        e.tick(99.0);
        assert!(!e.is_finished());
        e.tick(1.0);
        assert!(e.is_finished());
    }

    #[test]
    fn huge_rate_is_bounded_per_tick() {
        let mut e = Emitter::new(Vec2::ZERO, EmitterConfig::new(1e10, 100.0, EmitConfig::new()));
        assert_eq!(e.tick(16.0), Emitter::MAX_BURSTS_PER_TICK);
        assert_eq!(e.tick(16.0), Emitter::MAX_BURSTS_PER_TICK);
        let mut fast = emitter(1e8, 1000.0);
        assert_eq!(fast.tick(16.0), Emitter::MAX_BURSTS_PER_TICK);
    }

    #[test]
    fn zero_rate_never_emits() {
        let mut e = emitter(0.0, 1000.0);
        assert_eq!(e.tick(500.0), 0);
        let mut neg = emitter(-5.0, 1000.0);
        assert_eq!(neg.tick(500.0), 0);
    }
}
