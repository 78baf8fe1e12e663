//! Short-lived lightning bolts built by midpoint displacement.

use glam::Vec2;

use crate::color::Color;
use crate::core::rng::Rng;
use crate::renderer::{BlendMode, Surface};

/// A jagged bolt between two points. Lives for a fixed time regardless of
/// the effect that spawned it.
#[derive(Debug, Clone)]
pub struct Bolt {
    pub start: Vec2,
    pub end: Vec2,
    points: Vec<Vec2>,
    /// One perpendicular offset per interior point, as a fraction of the
    /// span being split.
    offsets: Vec<f32>,
    age: f32,
    lifespan: f32,
}

impl Bolt {
    /// Default lifetime in ms.
    pub const LIFESPAN: f32 = 150.0;
    const MAX_OFFSET: f32 = 0.25;

    /// Build a bolt with `2^depth` segments.
    pub fn new(start: Vec2, end: Vec2, depth: u32, rng: &mut Rng) -> Self {
        let segments = 1usize << depth;
        let mut bolt = Bolt {
            start,
            end,
            points: vec![Vec2::ZERO; segments + 1],
            offsets: (0..segments.saturating_sub(1))
                .map(|_| rng.signed() * Self::MAX_OFFSET)
                .collect(),
            age: 0.0,
            lifespan: Self::LIFESPAN,
        };
        bolt.rebuild();
        bolt
    }

    fn rebuild(&mut self) {
        let last = self.points.len() - 1;
        self.points[0] = self.start;
        self.points[last] = self.end;
        self.subdivide(0, last);
    }

    fn subdivide(&mut self, lo: usize, hi: usize) {
        if hi - lo <= 1 {
            return;
        }
        let mid = (lo + hi) / 2;
        let a = self.points[lo];
        let b = self.points[hi];
        let span = b - a;
        let offset = self.offsets.get(mid - 1).copied().unwrap_or(0.0);
        self.points[mid] = (a + b) * 0.5 + span.perp() * offset;

        self.subdivide(lo, mid);
        self.subdivide(mid, hi);
    }

    /// Nudge every interior point so the bolt crackles between frames.
    pub fn jitter(&mut self, amount: f32, rng: &mut Rng) {
        for o in &mut self.offsets {
            *o = (*o + rng.signed() * amount).clamp(-Self::MAX_OFFSET, Self::MAX_OFFSET);
        }
        self.rebuild();
    }

    /// Age by `dt` ms. Returns false once expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.age < self.lifespan
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifespan).clamp(0.0, 1.0)
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Color) {
        let alpha = self.alpha();
        if alpha <= 0.0 {
            return;
        }
        surface.save();
        surface.set_blend(BlendMode::Additive);
        surface.set_glow(8.0, color);
        surface.stroke_polyline(&self.points, 3.0, color.with_alpha(alpha * 0.6));
        surface.set_glow(0.0, color);
        surface.stroke_polyline(&self.points, 1.0, Color::WHITE.with_alpha(alpha));
        surface.restore();
    }
}
