use glam::Vec2;
use std::f32::consts::TAU;

use crate::color::Color;
use crate::core::rng::Rng;
use crate::renderer::{Gradient, Paint, Surface};

/// Static description of one parallax layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    pub count: usize,
    /// Drift in px per frame at zero player speed.
    pub speed: f32,
    pub size: f32,
    pub color: Color,
    pub twinkle: bool,
}

/// Far, mid and near layers.
pub const LAYERS: [LayerSpec; 3] = [
    LayerSpec {
        count: 80,
        speed: 0.3,
        size: 1.0,
        color: Color::rgb(0.6, 0.6, 0.8),
        twinkle: true,
    },
    LayerSpec {
        count: 50,
        speed: 0.7,
        size: 1.6,
        color: Color::rgb(0.8, 0.85, 1.0),
        twinkle: true,
    },
    LayerSpec {
        count: 25,
        speed: 1.4,
        size: 2.4,
        color: Color::WHITE,
        twinkle: false,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub alpha: f32,
    base_alpha: f32,
    phase: f32,
    twinkle_speed: f32,
}

#[derive(Debug, Clone)]
pub struct StarLayer {
    pub spec: LayerSpec,
    pub stars: Vec<Star>,
}

impl StarLayer {
    pub fn generate(spec: LayerSpec, size: Vec2, rng: &mut Rng) -> Self {
        let stars = (0..spec.count)
            .map(|_| {
                let base_alpha = rng.range(0.4, 1.0);
                Star {
                    pos: Vec2::new(rng.range(0.0, size.x), rng.range(0.0, size.y)),
                    alpha: base_alpha,
                    base_alpha,
                    phase: rng.angle(),
                    twinkle_speed: rng.range(0.02, 0.08),
                }
            })
            .collect();
        Self { spec, stars }
    }

    /// Drift by `dy` px, wrapping stars that leave the bottom back to the top
    /// at a fresh x.
    pub fn update(&mut self, frames: f32, dy: f32, size: Vec2, rng: &mut Rng) {
        for star in &mut self.stars {
            star.pos.y += dy;
            if star.pos.y > size.y {
                star.pos.y = 0.0;
                star.pos.x = rng.range(0.0, size.x);
            }
            if self.spec.twinkle {
                star.phase = (star.phase + star.twinkle_speed * frames) % TAU;
                star.alpha = star.base_alpha * (0.5 + 0.5 * star.phase.sin());
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for star in &self.stars {
            if star.alpha > 0.01 {
                surface.fill_circle(star.pos, self.spec.size, &Paint::from(self.spec.color.fade(star.alpha)));
            }
        }
    }
}

const NEBULA_COLORS: [Color; 4] = [
    Color::rgb(0.45, 0.1, 0.6),
    Color::rgb(0.1, 0.25, 0.7),
    Color::rgb(0.05, 0.5, 0.55),
    Color::rgb(0.6, 0.1, 0.35),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Nebula {
    pub pos: Vec2,
    pub radius: f32,
    pub inner: Color,
    pub outer: Color,
    pub rotation: f32,
    rotation_speed: f32,
    pulse: f32,
}

impl Nebula {
    /// Drift in px per frame.
    const DRIFT: f32 = 0.1;

    pub fn generate(size: Vec2, rng: &mut Rng) -> Self {
        Self {
            pos: Vec2::new(rng.range(0.0, size.x), rng.range(0.0, size.y)),
            radius: rng.range(120.0, 220.0),
            inner: rng.pick(&NEBULA_COLORS).copied().unwrap_or(Color::BLUE),
            outer: rng.pick(&NEBULA_COLORS).copied().unwrap_or(Color::MAGENTA),
            rotation: rng.angle(),
            rotation_speed: rng.range(-0.002, 0.002),
            pulse: rng.angle(),
        }
    }

    pub fn update(&mut self, frames: f32, speed_scale: f32, size: Vec2, rng: &mut Rng) {
        self.pos.y += Self::DRIFT * speed_scale * frames;
        if self.pos.y - self.radius > size.y {
            self.pos.y = -self.radius;
            self.pos.x = rng.range(0.0, size.x);
        }
        self.rotation += self.rotation_speed * frames;
        self.pulse = (self.pulse + 0.01 * frames) % TAU;
    }

    pub fn current_radius(&self) -> f32 {
        self.radius * (1.0 + 0.08 * self.pulse.sin())
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let r = self.current_radius();
        let gradient = Gradient::two(self.inner.with_alpha(0.18), self.outer.with_alpha(0.0))
            .with_stop(0.5, self.outer.with_alpha(0.08));
        surface.save();
        surface.translate(self.pos);
        surface.rotate(self.rotation);
        surface.scale(Vec2::new(1.0, 0.6));
        surface.fill_circle(Vec2::ZERO, r, &Paint::radial(Vec2::ZERO, 0.0, r, gradient));
        surface.restore();
    }
}
