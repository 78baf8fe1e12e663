use glam::Vec2;

use crate::color::Color;
use crate::renderer::{BlendMode, Gradient, Paint, Surface};

/// A pulsing halo pinned to a point of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowMarker {
    pub pos: Vec2,
    pub color: Color,
    pub radius: f32,
}

impl GlowMarker {
    /// Radians per ms of the pulse.
    const PULSE_RATE: f32 = 0.004;

    /// Pulse intensity in [0.4, 1.0] at `elapsed` ms.
    pub fn intensity(elapsed: f32) -> f32 {
        0.7 + 0.3 * (elapsed * Self::PULSE_RATE).sin()
    }

    pub fn draw(&self, surface: &mut dyn Surface, elapsed: f32) {
        let k = Self::intensity(elapsed);
        let radius = self.radius * (0.9 + 0.2 * k);
        let gradient = Gradient::two(self.color.with_alpha(0.6 * k), self.color.with_alpha(0.0));
        surface.save();
        surface.set_blend(BlendMode::Additive);
        surface.fill_circle(self.pos, radius, &Paint::radial(self.pos, 0.0, radius, gradient));
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_oscillates_within_bounds() {
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for ms in (0..4000).step_by(10) {
            let k = GlowMarker::intensity(ms as f32);
            lo = lo.min(k);
            hi = hi.max(k);
        }
        assert!(lo >= 0.4 - 1e-4 && lo < 0.45);
        assert!(hi <= 1.0 + 1e-4 && hi > 0.95);
    }
}
