//! Trauma-based screen shake.
//!
//! Trauma is a [0, 1] scalar that decays linearly. The visible shake is
//! `trauma²`, so light hits barely move the camera while heavy ones spike.
//! Offset and rotation are fresh noise every tick, with no smoothing.

use glam::Vec2;

use crate::core::rng::Rng;
use crate::renderer::Surface;

pub struct ScreenShake {
    trauma: f32,
    /// Trauma removed per second.
    pub decay: f32,
    /// Offset in px at full trauma.
    pub max_offset: f32,
    /// Rotation in radians at full trauma.
    pub max_rotation: f32,
    offset: Vec2,
    rotation: f32,
    rng: Rng,
}

impl ScreenShake {
    /// Below this trauma the camera is considered still.
    pub const EPSILON: f32 = 0.01;

    pub const SMALL: f32 = 0.2;
    pub const MEDIUM: f32 = 0.4;
    pub const LARGE: f32 = 0.7;
    pub const MASSIVE: f32 = 1.0;

    pub const DEFAULT_DECAY: f32 = 1.5;
    pub const DEFAULT_MAX_OFFSET: f32 = 20.0;
    pub const DEFAULT_MAX_ROTATION: f32 = 0.05;

    pub fn new(seed: u64) -> Self {
        Self {
            trauma: 0.0,
            decay: Self::DEFAULT_DECAY,
            max_offset: Self::DEFAULT_MAX_OFFSET,
            max_rotation: Self::DEFAULT_MAX_ROTATION,
            offset: Vec2::ZERO,
            rotation: 0.0,
            rng: Rng::new(seed),
        }
    }

    pub fn with_limits(mut self, decay: f32, max_offset: f32, max_rotation: f32) -> Self {
        self.decay = decay;
        self.max_offset = max_offset;
        self.max_rotation = max_rotation;
        self
    }

    /// Add trauma, clamped to [0, 1].
    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).clamp(0.0, 1.0);
    }

    pub fn small(&mut self) {
        self.add_trauma(Self::SMALL);
    }

    pub fn medium(&mut self) {
        self.add_trauma(Self::MEDIUM);
    }

    pub fn large(&mut self) {
        self.add_trauma(Self::LARGE);
    }

    pub fn massive(&mut self) {
        self.add_trauma(Self::MASSIVE);
    }

    /// Decay trauma by `dt` ms and resample the shake.
    pub fn update(&mut self, dt: f32) {
        self.trauma = (self.trauma - self.decay * dt / 1000.0).max(0.0);

        if self.trauma > Self::EPSILON {
            let magnitude = self.trauma * self.trauma;
            self.offset = Vec2::new(
                self.rng.signed() * self.max_offset * magnitude,
                self.rng.signed() * self.max_offset * magnitude,
            );
            self.rotation = self.rng.signed() * self.max_rotation * magnitude;
        } else {
            self.offset = Vec2::ZERO;
            self.rotation = 0.0;
        }
    }

    pub fn trauma(&self) -> f32 {
        self.trauma
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_shaking(&self) -> bool {
        self.trauma > Self::EPSILON
    }

    /// Push the shake transform, rotating around `center`. Does nothing while
    /// still. Pair every call with [`ScreenShake::restore`] before trauma changes.
    pub fn apply(&self, surface: &mut dyn Surface, center: Vec2) {
        if !self.is_shaking() {
            return;
        }
        surface.save();
        surface.translate(center + self.offset);
        surface.rotate(self.rotation);
        surface.translate(-center);
    }

    /// Pop the transform pushed by [`ScreenShake::apply`].
    pub fn restore(&self, surface: &mut dyn Surface) {
        if self.is_shaking() {
            surface.restore();
        }
    }

    pub fn reset(&mut self) {
        self.trauma = 0.0;
        self.offset = Vec2::ZERO;
        self.rotation = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};

    #[test]
    fn trauma_is_clamped() {
        let mut s = ScreenShake::new(1);
        s.add_trauma(0.3);
        s.add_trauma(0.9);
        assert_eq!(s.trauma(), 1.0);
        s.add_trauma(-5.0);
        assert_eq!(s.trauma(), 0.0);
    }

    #[test]
    fn tiers_add_fixed_amounts() {
        let mut s = ScreenShake::new(1);
        s.small();
        assert!((s.trauma() - 0.2).abs() < 1e-6);
        s.medium();
        assert!((s.trauma() - 0.6).abs() < 1e-6);
        s.large();
        assert_eq!(s.trauma(), 1.0);
    }

    #[test]
    fn decays_monotonically_to_zero_within_inverse_rate() {
        let mut s = ScreenShake::new(1);
        s.massive();
        let budget_ms = 1000.0 / s.decay;
        let mut elapsed = 0.0;
        let mut last = s.trauma();
        while elapsed < budget_ms + 16.0 {
            s.update(16.0);
            elapsed += 16.0;
            assert!(s.trauma() <= last);
            last = s.trauma();
        }
        assert_eq!(s.trauma(), 0.0);
        assert_eq!(s.offset(), Vec2::ZERO);
        assert_eq!(s.rotation(), 0.0);
    }

    #[test]
    fn offset_bounded_by_quadratic_magnitude() {
        let mut s = ScreenShake::new(5);
        for _ in 0..100 {
            s.reset();
            s.add_trauma(0.5);
            s.update(0.0);
            let bound = s.max_offset * 0.25;
            assert!(s.offset().x.abs() <= bound && s.offset().y.abs() <= bound);
            assert!(s.rotation().abs() <= s.max_rotation * 0.25);
        }
    }

    #[test]
    fn apply_and_restore_are_paired_only_while_shaking() {
        let s = ScreenShake::new(1);
        let mut list = DrawList::new(100.0, 100.0);
        s.apply(&mut list, Vec2::new(50.0, 50.0));
        s.restore(&mut list);
        assert!(list.is_empty());

        let mut s = ScreenShake::new(1);
        s.large();
        s.update(16.0);
        s.apply(&mut list, Vec2::new(50.0, 50.0));
        s.restore(&mut list);
        assert_eq!(list.commands().first(), Some(&DrawCommand::Save));
        assert_eq!(list.commands().last(), Some(&DrawCommand::Restore));
        assert_eq!(list.depth(), 0);
    }
}
