use glam::Vec2;
use std::f32::consts::PI;
use std::str::FromStr;

use crate::color::Color;
use crate::core::error::UnknownName;
use crate::renderer::{BlendMode, Gradient, Paint, Rect, Surface};
use crate::ui::easing::Easing;

/// Side of a pixel-dissolve block in px.
pub const DISSOLVE_BLOCK: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Covering circle grows from the center.
    CircleWipeIn,
    /// Covering circle shrinks back to the center.
    CircleWipeOut,
    DiagonalWipe,
    PixelDissolve,
    ZoomIn,
    ZoomOut,
    ColorShift,
    RadialBlur,
    Curtain,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 9] = [
        TransitionKind::CircleWipeIn,
        TransitionKind::CircleWipeOut,
        TransitionKind::DiagonalWipe,
        TransitionKind::PixelDissolve,
        TransitionKind::ZoomIn,
        TransitionKind::ZoomOut,
        TransitionKind::ColorShift,
        TransitionKind::RadialBlur,
        TransitionKind::Curtain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransitionKind::CircleWipeIn => "circleWipeIn",
            TransitionKind::CircleWipeOut => "circleWipeOut",
            TransitionKind::DiagonalWipe => "diagonalWipe",
            TransitionKind::PixelDissolve => "pixelDissolve",
            TransitionKind::ZoomIn => "zoomIn",
            TransitionKind::ZoomOut => "zoomOut",
            TransitionKind::ColorShift => "colorShift",
            TransitionKind::RadialBlur => "radialBlur",
            TransitionKind::Curtain => "curtain",
        }
    }

    /// Render one frame at `progress` in [0, 1]. Pure with respect to any
    /// transition state.
    pub fn draw(self, surface: &mut dyn Surface, progress: f32, color: Color) {
        let p = progress.clamp(0.0, 1.0);
        let size = surface.size();
        let center = size * 0.5;
        let full = Rect::new(0.0, 0.0, size.x, size.y);
        let max_radius = center.length();

        surface.save();
        match self {
            TransitionKind::CircleWipeIn => {
                surface.fill_circle(center, max_radius * p, &Paint::from(color));
            }
            TransitionKind::CircleWipeOut => {
                surface.fill_circle(center, max_radius * (1.0 - p), &Paint::from(color));
            }
            TransitionKind::DiagonalWipe => {
                // Covers every point with x + y below the sweep line.
                let d = p * (size.x + size.y);
                surface.fill_polygon(
                    &[Vec2::ZERO, Vec2::new(d, 0.0), Vec2::new(0.0, d)],
                    &Paint::from(color),
                );
            }
            TransitionKind::PixelDissolve => {
                for rect in dissolve_blocks(size, p) {
                    surface.fill_rect(rect, &Paint::from(color));
                }
            }
            TransitionKind::ZoomIn => {
                let grown = size * Easing::QuadOut.apply(p);
                surface.set_alpha(p);
                surface.fill_rect(Rect::centered(center, grown), &Paint::from(color));
            }
            TransitionKind::ZoomOut => {
                let shrunk = size * (1.0 - Easing::QuadOut.apply(p));
                surface.set_alpha(1.0 - p);
                surface.fill_rect(Rect::centered(center, shrunk), &Paint::from(color));
            }
            TransitionKind::ColorShift => {
                let tint = Color::hsl(p * 360.0, 1.0, 0.5).with_alpha((p * PI).sin() * 0.4);
                surface.set_blend(BlendMode::Additive);
                surface.fill_rect(full, &Paint::from(tint));
            }
            TransitionKind::RadialBlur => {
                let strength = (p * PI).sin();
                let gradient = Gradient::two(color.with_alpha(0.0), color.with_alpha(strength));
                surface.fill_rect(
                    full,
                    &Paint::radial(center, max_radius * (1.0 - strength) * 0.8, max_radius, gradient),
                );
                for i in 1..=4 {
                    let r = max_radius * (i as f32 / 5.0) * (1.0 + strength * 0.1);
                    surface.stroke_circle(center, r, 2.0, color.with_alpha(strength * 0.15));
                }
            }
            TransitionKind::Curtain => {
                let w = size.x * 0.5 * Easing::SineInOut.apply(p);
                surface.fill_rect(Rect::new(0.0, 0.0, w, size.y), &Paint::from(color));
                surface.fill_rect(Rect::new(size.x - w, 0.0, w, size.y), &Paint::from(color));
            }
        }
        surface.restore();
    }
}

/// Blocks covered at `progress`. A block at grid `(bx, by)` appears once
/// progress passes `(bx + by) / (cols + rows)`, so the cover sweeps in
/// diagonally from the top-left corner.
pub fn dissolve_blocks(size: Vec2, progress: f32) -> Vec<Rect> {
    let cols = (size.x / DISSOLVE_BLOCK).ceil().max(1.0) as u32;
    let rows = (size.y / DISSOLVE_BLOCK).ceil().max(1.0) as u32;
    let span = (cols + rows) as f32;

    let mut blocks = Vec::new();
    for by in 0..rows {
        for bx in 0..cols {
            let threshold = (bx + by) as f32 / span;
            if progress > threshold {
                blocks.push(Rect::new(
                    bx as f32 * DISSOLVE_BLOCK,
                    by as f32 * DISSOLVE_BLOCK,
                    DISSOLVE_BLOCK,
                    DISSOLVE_BLOCK,
                ));
            }
        }
    }
    blocks
}

impl FromStr for TransitionKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransitionKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownName::new("transition", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};

    #[test]
    fn parses_camel_case_names() {
        for kind in TransitionKind::ALL {
            assert_eq!(kind.name().parse::<TransitionKind>(), Ok(kind));
        }
        let err = "wobble".parse::<TransitionKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown transition 'wobble'");
    }

    #[test]
    fn dissolve_reveals_diagonally() {
        let size = Vec2::new(400.0, 200.0); // 10 x 5 blocks
        assert!(dissolve_blocks(size, 0.0).is_empty());
        let early = dissolve_blocks(size, 0.1);
        assert!(early.iter().all(|r| r.pos.x + r.pos.y < 0.1 * 15.0 * DISSOLVE_BLOCK));
        assert!(early.iter().any(|r| r.pos == Vec2::ZERO));
        assert_eq!(dissolve_blocks(size, 1.0).len(), 50);
    }

    #[test]
    fn circle_wipe_radius_is_linear_in_progress() {
        let mut list = DrawList::new(300.0, 400.0);
        TransitionKind::CircleWipeIn.draw(&mut list, 0.5, Color::BLACK);
        TransitionKind::CircleWipeOut.draw(&mut list, 0.25, Color::BLACK);
        let radii: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert!((radii[0] - 125.0).abs() < 1e-3);
        assert!((radii[1] - 187.5).abs() < 1e-3);
    }

    #[test]
    fn color_shift_uses_additive_blend() {
        let mut list = DrawList::new(100.0, 100.0);
        TransitionKind::ColorShift.draw(&mut list, 0.5, Color::WHITE);
        assert!(list
            .commands()
            .contains(&DrawCommand::Blend { mode: BlendMode::Additive }));
    }

    #[test]
    fn every_kind_draws_balanced() {
        for kind in TransitionKind::ALL {
            let mut list = DrawList::new(320.0, 240.0);
            kind.draw(&mut list, 0.6, Color::BLACK);
            assert_eq!(list.depth(), 0, "{}", kind.name());
            assert!(list.commands().iter().any(DrawCommand::is_paint), "{}", kind.name());
        }
    }
}
