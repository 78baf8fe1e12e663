//! Recording surface: captures draw calls as serializable commands.
//!
//! A Canvas 2D host replays the list each frame; tests inspect it to check
//! what was drawn and in which order.

use glam::Vec2;
use serde::Serialize;

use super::layer::DrawLayer;
use super::surface::{BlendMode, Paint, Rect, Surface, TextStyle};
use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Layer { layer: DrawLayer },
    Save,
    Restore,
    Translate { offset: Vec2 },
    Rotate { radians: f32 },
    Scale { factor: Vec2 },
    Alpha { alpha: f32 },
    Blend { mode: BlendMode },
    Glow { radius: f32, color: Color },
    FillCircle { center: Vec2, radius: f32, paint: Paint },
    StrokeCircle { center: Vec2, radius: f32, width: f32, color: Color },
    FillRect { rect: Rect, paint: Paint },
    StrokeRect { rect: Rect, width: f32, color: Color },
    FillRoundedRect { rect: Rect, radius: f32, paint: Paint },
    FillPolygon { points: Vec<Vec2>, paint: Paint },
    StrokePolyline { points: Vec<Vec2>, width: f32, color: Color },
    Text { text: String, pos: Vec2, style: TextStyle },
}

impl DrawCommand {
    /// Whether this command puts pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            Self::FillCircle { .. }
                | Self::StrokeCircle { .. }
                | Self::FillRect { .. }
                | Self::StrokeRect { .. }
                | Self::FillRoundedRect { .. }
                | Self::FillPolygon { .. }
                | Self::StrokePolyline { .. }
                | Self::Text { .. }
        )
    }
}

/// A [`Surface`] that records every call.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::with_capacity(1024),
            depth: 0,
        }
    }

    /// Clear recorded commands. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Current save/restore nesting depth; zero when every save was restored.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Layers in the order they were started.
    pub fn layers(&self) -> Vec<DrawLayer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Layer { layer } => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Number of pixel-producing commands recorded under `layer`.
    pub fn paint_count_in(&self, layer: DrawLayer) -> usize {
        let mut current = None;
        let mut count = 0;
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Layer { layer: l } => current = Some(*l),
                c if c.is_paint() && current == Some(layer) => count += 1,
                _ => {}
            }
        }
        count
    }

    /// All text strings drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate { offset });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn scale(&mut self, factor: Vec2) {
        self.commands.push(DrawCommand::Scale { factor });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha { alpha });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::Blend { mode });
    }

    fn set_glow(&mut self, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Glow { radius, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, width, color });
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect { rect, paint: paint.clone() });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { rect, width, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            radius,
            paint: paint.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            paint: paint.clone(),
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style: style.clone(),
        });
    }

    fn begin_layer(&mut self, layer: DrawLayer) {
        self.commands.push(DrawCommand::Layer { layer });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut list = DrawList::new(100.0, 100.0);
        list.save();
        list.fill_circle(Vec2::ZERO, 5.0, &Color::RED.into());
        list.restore();
        assert_eq!(list.len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Save);
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn paint_count_is_scoped_to_layer() {
        let mut list = DrawList::new(100.0, 100.0);
        list.begin_layer(DrawLayer::Background);
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &Color::BLACK.into());
        list.begin_layer(DrawLayer::Ui);
        list.fill_text("hi", Vec2::ZERO, &TextStyle::new(12.0, Color::WHITE));
        list.set_alpha(0.5);
        assert_eq!(list.paint_count_in(DrawLayer::Background), 1);
        assert_eq!(list.paint_count_in(DrawLayer::Ui), 1);
        assert_eq!(list.layers(), vec![DrawLayer::Background, DrawLayer::Ui]);
        assert_eq!(list.texts(), vec!["hi"]);
    }

    #[test]
    fn serializes_with_op_tags() {
        let mut list = DrawList::new(10.0, 10.0);
        list.set_blend(BlendMode::Additive);
        let json = list.to_json().unwrap();
        assert_eq!(json, r#"[{"op":"blend","mode":"additive"}]"#);
    }
}
