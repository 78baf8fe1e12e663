//! Abstract 2D drawing capability.
//!
//! Every subsystem draws through [`Surface`]; the host decides what a
//! surface is (a Canvas 2D replay list, a tessellated vertex buffer, ...).
//! The transform/alpha/blend/glow state is a stack: `save` pushes,
//! `restore` pops, exactly like a canvas context.

use glam::Vec2;
use serde::Serialize;

use super::layer::DrawLayer;
use crate::color::Color;

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self { pos: center - size * 0.5, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let Rect { pos, size } = *self;
        [
            pos,
            Vec2::new(pos.x + size.x, pos.y),
            pos + size,
            Vec2::new(pos.x, pos.y + size.y),
        ]
    }
}

/// Blend mode for subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    /// Standard alpha blending ("source-over").
    #[default]
    Alpha,
    /// Additive blending ("lighter").
    Additive,
}

/// Color stops in [0, 1], sorted by offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub stops: Vec<(f32, Color)>,
}

impl Gradient {
    pub fn two(from: Color, to: Color) -> Self {
        Self {
            stops: vec![(0.0, from), (1.0, to)],
        }
    }

    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.push((offset, color));
        self.stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    /// Color at offset `t`, clamped to the first and last stop.
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.0 {
                let span = (b.0 - a.0).max(f32::EPSILON);
                return a.1.lerp(b.1, (t - a.0) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

/// How a filled shape is colored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Paint {
    Solid { color: Color },
    Linear { from: Vec2, to: Vec2, gradient: Gradient },
    Radial { center: Vec2, inner: f32, outer: f32, gradient: Gradient },
}

impl Paint {
    pub fn radial(center: Vec2, inner: f32, outer: f32, gradient: Gradient) -> Self {
        Paint::Radial { center, inner, outer, gradient }
    }

    pub fn linear(from: Vec2, to: Vec2, gradient: Gradient) -> Self {
        Paint::Linear { from, to, gradient }
    }

    /// Color at a point, in the same coordinate space as the paint geometry.
    pub fn color_at(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid { color } => *color,
            Paint::Linear { from, to, gradient } => {
                let axis = *to - *from;
                let len2 = axis.length_squared().max(f32::EPSILON);
                gradient.color_at((p - *from).dot(axis) / len2)
            }
            Paint::Radial { center, inner, outer, gradient } => {
                let span = (outer - inner).max(f32::EPSILON);
                gradient.color_at((p.distance(*center) - inner) / span)
            }
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid { color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Center,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// The drawing contract used by every subsystem.
pub trait Surface {
    /// Drawable area in surface units.
    fn size(&self) -> Vec2;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: Vec2);

    /// Set the global alpha for subsequent draws (saved/restored with the state).
    fn set_alpha(&mut self, alpha: f32);
    fn set_blend(&mut self, mode: BlendMode);
    /// Shadow/glow approximation; a radius of 0 disables it.
    fn set_glow(&mut self, radius: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint);
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);

    /// Marks the start of a compositing layer. Surfaces that batch by layer
    /// override this; the default ignores it.
    fn begin_layer(&mut self, _layer: DrawLayer) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_between_stops() {
        let g = Gradient::two(Color::BLACK, Color::WHITE);
        let mid = g.color_at(0.5);
        assert!((mid.r - 0.5).abs() < 1e-4);
        assert_eq!(g.color_at(-1.0), Color::BLACK);
        assert_eq!(g.color_at(2.0), Color::WHITE);
    }

    #[test]
    fn with_stop_keeps_offsets_sorted() {
        let g = Gradient::two(Color::RED, Color::BLUE).with_stop(0.5, Color::GREEN);
        let offsets: Vec<f32> = g.stops.iter().map(|s| s.0).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert_eq!(g.color_at(0.5), Color::GREEN);
    }

    #[test]
    fn radial_paint_uses_distance_from_center() {
        let paint = Paint::radial(
            Vec2::ZERO,
            0.0,
            10.0,
            Gradient::two(Color::WHITE, Color::TRANSPARENT),
        );
        assert_eq!(paint.color_at(Vec2::ZERO), Color::WHITE);
        assert!(paint.color_at(Vec2::new(10.0, 0.0)).a < 1e-4);
    }

    #[test]
    fn linear_paint_projects_onto_axis() {
        let paint = Paint::linear(
            Vec2::ZERO,
            Vec2::new(0.0, 100.0),
            Gradient::two(Color::BLACK, Color::WHITE),
        );
        let c = paint.color_at(Vec2::new(40.0, 25.0));
        assert!((c.r - 0.25).abs() < 1e-4);
    }

    #[test]
    fn rect_helpers() {
        let r = Rect::centered(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(r.pos, Vec2::new(40.0, 45.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
        assert_eq!(r.corners()[2], Vec2::new(60.0, 55.0));
    }
}
