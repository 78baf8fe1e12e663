//! Parallax starfield with nebulae, meteors and speed/warp overlays.

mod stars;
mod streaks;

pub use stars::{LayerSpec, Nebula, Star, StarLayer, LAYERS};
pub use streaks::{Meteor, SpeedLine, WarpLine};

use glam::Vec2;

use crate::color::Color;
use crate::core::rng::Rng;
use crate::core::FRAME_MS;
use crate::renderer::{Gradient, Paint, Rect, Surface};

const NEBULA_COUNT: usize = 3;
/// Chance per tick that a meteor appears.
pub const METEOR_CHANCE: f32 = 0.004;
const SPEED_LINE_CHANCE: f32 = 0.35;
const WARP_LINE_CHANCE: f32 = 0.5;
/// How strongly player speed accelerates the drift.
pub const SPEED_FACTOR: f32 = 0.2;

const SKY_TOP: Color = Color::rgb(0.02, 0.01, 0.08);
const SKY_BOTTOM: Color = Color::rgb(0.05, 0.02, 0.15);

pub struct ParallaxBackground {
    size: Vec2,
    layers: Vec<StarLayer>,
    nebulae: Vec<Nebula>,
    meteors: Vec<Meteor>,
    speed_lines: Vec<SpeedLine>,
    warp_lines: Vec<WarpLine>,
    speed_line_threshold: f32,
    rng: Rng,
}

impl ParallaxBackground {
    pub const DEFAULT_SPEED_LINE_THRESHOLD: f32 = 5.0;

    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut bg = Self {
            size: Vec2::new(width, height),
            layers: Vec::new(),
            nebulae: Vec::new(),
            meteors: Vec::new(),
            speed_lines: Vec::new(),
            warp_lines: Vec::new(),
            speed_line_threshold: Self::DEFAULT_SPEED_LINE_THRESHOLD,
            rng: Rng::new(seed),
        };
        bg.generate();
        bg
    }

    pub fn with_speed_line_threshold(mut self, threshold: f32) -> Self {
        self.speed_line_threshold = threshold;
        self
    }

    fn generate(&mut self) {
        let size = self.size;
        let rng = &mut self.rng;
        self.layers = LAYERS.iter().map(|spec| StarLayer::generate(*spec, size, rng)).collect();
        self.nebulae = (0..NEBULA_COUNT).map(|_| Nebula::generate(size, rng)).collect();
    }

    /// Regenerate every layer for new surface dimensions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.meteors.clear();
        self.speed_lines.clear();
        self.warp_lines.clear();
        self.generate();
    }

    pub fn update(&mut self, dt: f32, player_speed: f32, fever: bool) {
        let frames = dt.max(0.0) / FRAME_MS;
        let speed_scale = 1.0 + player_speed.max(0.0) * SPEED_FACTOR;
        let size = self.size;

        for layer in &mut self.layers {
            let dy = layer.spec.speed * speed_scale * frames;
            layer.update(frames, dy, size, &mut self.rng);
        }
        for nebula in &mut self.nebulae {
            nebula.update(frames, speed_scale, size, &mut self.rng);
        }

        if self.rng.chance(METEOR_CHANCE) {
            self.meteors.push(Meteor::spawn(size, &mut self.rng));
        }
        self.meteors.retain_mut(|m| m.tick(dt, frames, size));

        if player_speed > self.speed_line_threshold && self.rng.chance(SPEED_LINE_CHANCE) {
            self.speed_lines.push(SpeedLine::spawn(size, &mut self.rng));
        }
        self.speed_lines.retain_mut(|l| l.tick(frames, size.y));

        if fever && self.rng.chance(WARP_LINE_CHANCE) {
            self.warp_lines.push(WarpLine::spawn(size, &mut self.rng));
        }
        self.warp_lines.retain_mut(|w| w.tick(frames, size.y));
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let sky = Paint::linear(Vec2::ZERO, Vec2::new(0.0, self.size.y), Gradient::two(SKY_TOP, SKY_BOTTOM));
        surface.fill_rect(Rect::new(0.0, 0.0, self.size.x, self.size.y), &sky);

        for nebula in &self.nebulae {
            nebula.draw(surface);
        }
        for layer in &self.layers {
            layer.draw(surface);
        }
        for meteor in &self.meteors {
            meteor.draw(surface);
        }
        for line in &self.speed_lines {
            line.draw(surface);
        }
        for line in &self.warp_lines {
            line.draw(surface);
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn layers(&self) -> &[StarLayer] {
        &self.layers
    }

    pub fn nebulae(&self) -> &[Nebula] {
        &self.nebulae
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn speed_line_count(&self) -> usize {
        self.speed_lines.len()
    }

    pub fn warp_line_count(&self) -> usize {
        self.warp_lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    #[test]
    fn three_layers_with_distinct_speeds() {
        let bg = ParallaxBackground::new(800.0, 600.0, 1);
        assert_eq!(bg.layers().len(), 3);
        assert!(bg.layers()[0].spec.speed < bg.layers()[1].spec.speed);
        assert!(bg.layers()[1].spec.speed < bg.layers()[2].spec.speed);
        assert_eq!(bg.layers()[2].stars.len(), LAYERS[2].count);
        assert_eq!(bg.nebulae().len(), NEBULA_COUNT);
    }

    #[test]
    fn star_wraps_to_top_with_new_x() {
        let mut bg = ParallaxBackground::new(800.0, 600.0, 3);
        let old_x = 123.456;
        bg.layers[2].stars[0].pos = Vec2::new(old_x, 599.9);
        bg.update(FRAME_MS, 0.0, false);
        let star = &bg.layers[2].stars[0];
        assert_eq!(star.pos.y, 0.0);
        assert!(star.pos.x != old_x);
        assert!((0.0..800.0).contains(&star.pos.x));
    }

    #[test]
    fn player_speed_scales_drift() {
        let mut slow = ParallaxBackground::new(800.0, 600.0, 5);
        let mut fast = ParallaxBackground::new(800.0, 600.0, 5);
        slow.layers[0].stars[0].pos.y = 10.0;
        fast.layers[0].stars[0].pos.y = 10.0;
        slow.update(FRAME_MS, 0.0, false);
        fast.update(FRAME_MS, 10.0, false);
        let slow_dy = slow.layers[0].stars[0].pos.y - 10.0;
        let fast_dy = fast.layers[0].stars[0].pos.y - 10.0;
        assert!((fast_dy / slow_dy - 3.0).abs() < 1e-3);
    }

    #[test]
    fn overlays_follow_external_flags() {
        let mut bg = ParallaxBackground::new(800.0, 600.0, 9);
        for _ in 0..60 {
            bg.update(FRAME_MS, 0.0, false);
        }
        assert_eq!(bg.speed_line_count(), 0);
        assert_eq!(bg.warp_line_count(), 0);

        for _ in 0..60 {
            bg.update(FRAME_MS, 8.0, true);
        }
        assert!(bg.speed_line_count() > 0);
        assert!(bg.warp_line_count() > 0);
    }

    #[test]
    fn resize_regenerates_within_new_bounds() {
        let mut bg = ParallaxBackground::new(800.0, 600.0, 4);
        bg.resize(200.0, 100.0);
        assert_eq!(bg.size(), Vec2::new(200.0, 100.0));
        for layer in bg.layers() {
            assert!(layer.stars.iter().all(|s| s.pos.x < 200.0 && s.pos.y < 100.0));
        }
    }

    #[test]
    fn draw_starts_with_sky_and_is_balanced() {
        let bg = ParallaxBackground::new(320.0, 240.0, 1);
        let mut list = DrawList::new(320.0, 240.0);
        bg.draw(&mut list);
        assert!(matches!(list.commands()[0], crate::renderer::DrawCommand::FillRect { .. }));
        assert_eq!(list.depth(), 0);
    }
}
