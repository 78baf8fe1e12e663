//! A single particle: physics integration and shape rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::color::Color;
use crate::renderer::{Paint, Rect, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticleShape {
    #[default]
    Circle,
    Star,
    Square,
    Line,
    /// Expanding ring; radius grows as the particle ages.
    Shockwave,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Color,
    /// Remaining life in seconds.
    pub life: f32,
    pub max_life: f32,
    /// `life / max_life`, never negative.
    pub alpha: f32,
    pub shape: ParticleShape,
    pub gravity: f32,
    pub friction: f32,
    pub bounce: bool,
    /// Past positions, oldest first. `None` when trails are off.
    pub trail: Option<VecDeque<Vec2>>,
    pub trail_length: usize,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Glow radius in px; `None` draws without glow.
    pub glow: Option<f32>,
}

impl Particle {
    /// Restitution applied to vertical speed on a floor bounce.
    pub const BOUNCE_DAMPING: f32 = 0.6;
    /// Shockwave ring grows to this multiple of its size.
    const SHOCKWAVE_GROWTH: f32 = 6.0;

    pub fn new(position: Vec2, velocity: Vec2, size: f32, color: Color, life: f32) -> Self {
        Particle {
            position,
            velocity,
            size,
            color,
            life,
            max_life: life,
            alpha: 1.0,
            shape: ParticleShape::Circle,
            gravity: 0.0,
            friction: 1.0,
            bounce: false,
            trail: None,
            trail_length: 0,
            rotation: 0.0,
            rotation_speed: 0.0,
            glow: None,
        }
    }

    /// Advance one tick. `dt` is in milliseconds; `floor` is the y used for
    /// bouncing. Returns false when expired.
    pub fn tick(&mut self, dt: f32, floor: f32) -> bool {
        if let Some(trail) = &mut self.trail {
            trail.push_back(self.position);
            while trail.len() > self.trail_length {
                trail.pop_front();
            }
        }

        self.position += self.velocity;
        self.velocity.y += self.gravity;
        self.velocity *= self.friction;

        if self.bounce && self.position.y > floor && self.velocity.y > 0.0 {
            self.position.y = floor;
            self.velocity.y = -self.velocity.y * Self::BOUNCE_DAMPING;
        }

        self.rotation += self.rotation_speed;
        self.life -= dt / 1000.0;
        self.alpha = if self.max_life > 0.0 {
            (self.life / self.max_life).max(0.0)
        } else {
            0.0
        };

        self.life > 0.0
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.set_alpha(self.alpha);

        if let Some(trail) = &self.trail {
            if trail.len() > 1 {
                let points: Vec<Vec2> = trail.iter().copied().collect();
                surface.stroke_polyline(&points, self.size * 0.5, self.color.fade(0.5));
            }
        }

        if let Some(radius) = self.glow {
            surface.set_glow(radius, self.color);
        }

        let paint = Paint::from(self.color);
        match self.shape {
            ParticleShape::Circle => {
                surface.fill_circle(self.position, self.size, &paint);
            }
            ParticleShape::Square => {
                surface.translate(self.position);
                surface.rotate(self.rotation);
                surface.fill_rect(Rect::centered(Vec2::ZERO, Vec2::splat(self.size * 2.0)), &paint);
            }
            ParticleShape::Star => {
                surface.translate(self.position);
                surface.rotate(self.rotation);
                surface.fill_polygon(&star_points(5, self.size, self.size * 0.5), &paint);
            }
            ParticleShape::Line => {
                let dir = self.velocity.normalize_or(Vec2::X);
                let tail = self.position - dir * self.size * 3.0;
                surface.stroke_polyline(&[tail, self.position], self.size * 0.5, self.color);
            }
            ParticleShape::Shockwave => {
                let grown = self.size * (1.0 + (1.0 - self.alpha) * Self::SHOCKWAVE_GROWTH);
                surface.stroke_circle(self.position, grown, (self.size * 0.5 * self.alpha).max(0.5), self.color);
            }
        }

        surface.restore();
    }
}

/// Outline of a star centered on the origin, first point straight up.
pub fn star_points(spikes: usize, outer: f32, inner: f32) -> Vec<Vec2> {
    let step = PI / spikes as f32;
    (0..spikes * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f32 * step - FRAC_PI_2;
            Vec2::new(a.cos() * r, a.sin() * r)
        })
        .collect()
}
