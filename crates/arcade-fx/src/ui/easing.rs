//! Easing curves used by notifications, bars and transitions.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadOut,
    /// `1 - (1 - t)³`. Used by bar tweens.
    CubicOut,
    SineInOut,
    /// Four-segment quadratic bounce. Overshoots back below 1 between
    /// segments, so it is not monotonic.
    BounceOut,
}

impl Easing {
    /// Map `t` (clamped to [0, 1]) through the curve.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BounceOut => bounce_out(t),
        }
    }
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    let (shift, floor) = if t < 1.0 / D1 {
        (0.0, 0.0)
    } else if t < 2.0 / D1 {
        (1.5 / D1, 0.75)
    } else if t < 2.5 / D1 {
        (2.25 / D1, 0.9375)
    } else {
        (2.625 / D1, 0.984375)
    };
    let t = t - shift;
    N1 * t * t + floor
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate from `a` to `b` along `easing`.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::SineInOut,
        Easing::BounceOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-5, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-5, "{e:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-1.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(2.0), 1.0);
    }

    #[test]
    fn cubic_out_front_loads_progress() {
        assert!((Easing::CubicOut.apply(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn bounce_out_stays_in_unit_range() {
        for i in 0..=100 {
            let v = Easing::BounceOut.apply(i as f32 / 100.0);
            assert!((0.0..=1.0 + 1e-5).contains(&v), "{v}");
        }
        // First bounce lands exactly at 1/2.75.
        assert!((Easing::BounceOut.apply(1.0 / 2.75) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ease_interpolates() {
        assert_eq!(ease(10.0, 20.0, 0.5, Easing::Linear), 15.0);
        assert_eq!(lerp(0.0, 4.0, 0.25), 1.0);
    }
}
