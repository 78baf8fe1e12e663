use glam::Vec2;
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::color::Color;
use crate::core::rng::Rng;
use crate::renderer::{BlendMode, Paint, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    pub pos: Vec2,
    /// px per frame.
    pub vel: Vec2,
    pub trail: VecDeque<Vec2>,
    /// Remaining life in ms.
    pub life: f32,
    pub color: Color,
}

impl Meteor {
    pub const TRAIL_LEN: usize = 14;
    pub const LIFE_MS: f32 = 3000.0;
    /// Distance past the surface edge before a meteor is dropped.
    pub const MARGIN: f32 = 100.0;

    /// Launch from a random edge (top, left or right), heading down and inward.
    pub fn spawn(size: Vec2, rng: &mut Rng) -> Self {
        let (pos, heading) = match rng.next_int(3) {
            0 => (Vec2::new(rng.range(0.0, size.x), -20.0), FRAC_PI_2),
            1 => (Vec2::new(-20.0, rng.range(0.0, size.y * 0.5)), FRAC_PI_4),
            _ => (Vec2::new(size.x + 20.0, rng.range(0.0, size.y * 0.5)), PI - FRAC_PI_4),
        };
        let angle = heading + rng.range(-0.3, 0.3);
        Self {
            pos,
            vel: Vec2::from_angle(angle) * rng.range(6.0, 10.0),
            trail: VecDeque::with_capacity(Self::TRAIL_LEN + 1),
            life: Self::LIFE_MS,
            color: if rng.chance(0.5) { Color::WHITE } else { Color::rgb(1.0, 0.85, 0.6) },
        }
    }

    /// Returns false once timed out or outside the extended bounds.
    pub fn tick(&mut self, dt: f32, frames: f32, size: Vec2) -> bool {
        self.trail.push_back(self.pos);
        while self.trail.len() > Self::TRAIL_LEN {
            self.trail.pop_front();
        }
        self.pos += self.vel * frames;
        self.life -= dt;

        let m = Self::MARGIN;
        let inside = self.pos.x > -m && self.pos.x < size.x + m && self.pos.y > -m && self.pos.y < size.y + m;
        self.life > 0.0 && inside
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.trail.len() > 1 {
            let points: Vec<Vec2> = self.trail.iter().copied().chain([self.pos]).collect();
            surface.stroke_polyline(&points, 2.0, self.color.fade(0.4));
        }
        surface.save();
        surface.set_glow(10.0, self.color);
        surface.fill_circle(self.pos, 2.5, &Paint::from(self.color));
        surface.restore();
    }
}

/// Vertical streak shown while the player is fast.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedLine {
    pub pos: Vec2,
    pub length: f32,
    /// px per frame.
    pub speed: f32,
    pub alpha: f32,
}

impl SpeedLine {
    pub fn spawn(size: Vec2, rng: &mut Rng) -> Self {
        let length = rng.range(40.0, 120.0);
        Self {
            pos: Vec2::new(rng.range(0.0, size.x), -length),
            length,
            speed: rng.range(15.0, 25.0),
            alpha: rng.range(0.2, 0.5),
        }
    }

    /// Returns false once the tail has passed the bottom.
    pub fn tick(&mut self, frames: f32, height: f32) -> bool {
        self.pos.y += self.speed * frames;
        self.pos.y - self.length <= height
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let tail = self.pos - Vec2::new(0.0, self.length);
        surface.stroke_polyline(&[tail, self.pos], 1.5, Color::WHITE.with_alpha(self.alpha));
    }
}

/// Colored streak shown during fever mode. Fades as it falls.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpLine {
    pub pos: Vec2,
    pub length: f32,
    pub speed: f32,
    pub alpha: f32,
    pub width: f32,
    pub color: Color,
}

impl WarpLine {
    /// Alpha lost per frame.
    const FADE: f32 = 0.012;

    pub fn spawn(size: Vec2, rng: &mut Rng) -> Self {
        Self {
            pos: Vec2::new(rng.range(0.0, size.x), rng.range(-100.0, size.y * 0.5)),
            length: rng.range(60.0, 180.0),
            speed: rng.range(20.0, 35.0),
            alpha: rng.range(0.6, 0.9),
            width: rng.range(1.0, 3.0),
            color: Color::hsl(rng.range(260.0, 340.0), 1.0, 0.6),
        }
    }

    /// Returns false on reaching the bottom or fading out.
    pub fn tick(&mut self, frames: f32, height: f32) -> bool {
        self.pos.y += self.speed * frames;
        self.alpha -= Self::FADE * frames;
        self.alpha > 0.0 && self.pos.y - self.length <= height
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let tail = self.pos - Vec2::new(0.0, self.length);
        surface.save();
        surface.set_blend(BlendMode::Additive);
        surface.set_glow(self.width * 3.0, self.color);
        surface.stroke_polyline(&[tail, self.pos], self.width, self.color.with_alpha(self.alpha));
        surface.restore();
    }
}
