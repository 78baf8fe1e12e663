//! Lyon-based tessellating surface.
//!
//! Implements [`Surface`] by tessellating every shape on the CPU into a flat
//! triangle-list vertex buffer (`[x, y, r, g, b, a]` per vertex) that a GPU
//! host uploads as-is. Transforms are baked into vertex positions and
//! gradients are evaluated per vertex. Text is not rasterized here; runs are
//! collected for the host's font renderer.
//!
//! # Usage
//!
//! ```ignore
//! let mut surface = VectorSurface::new(800.0, 600.0);
//! compositor.draw(&mut surface);
//! upload(surface.buffer_ptr(), surface.vertex_count());
//! surface.clear();
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};
use lyon::math::{point, Box2D, Transform};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use serde::Serialize;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use super::layer::DrawLayer;
use super::surface::{BlendMode, Gradient, Paint, Rect, Surface, TextAlign, TextStyle};
use crate::color::Color;

/// Per-vertex data. 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Contiguous vertex range drawn with one blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendSpan {
    pub mode: BlendMode,
    pub start: u32,
    pub end: u32,
}

/// Contiguous vertex range belonging to one draw layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBatch {
    pub layer: DrawLayer,
    pub start: u32,
    pub end: u32,
}

/// A text draw the host must render, already in surface space.
///
/// `layer` is the layer open when the text was drawn; hosts interleave runs
/// with the vertex batch of the same layer to keep overlays on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub layer: DrawLayer,
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    blend: BlendMode,
    glow: Option<(f32, Color)>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            blend: BlendMode::Alpha,
            glow: None,
        }
    }
}

struct PaintVertexCtor<'a> {
    paint: &'a Paint,
    alpha: f32,
}

impl PaintVertexCtor<'_> {
    fn vertex(&self, x: f32, y: f32) -> VectorVertex {
        let c = self.paint.color_at(Vec2::new(x, y));
        VectorVertex { x, y, r: c.r, g: c.g, b: c.b, a: c.a * self.alpha }
    }
}

impl FillVertexConstructor<VectorVertex> for PaintVertexCtor<'_> {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        self.vertex(p.x, p.y)
    }
}

impl StrokeVertexConstructor<VectorVertex> for PaintVertexCtor<'_> {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        self.vertex(p.x, p.y)
    }
}

/// Tessellating [`Surface`] backed by lyon.
pub struct VectorSurface {
    size: Vec2,
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    state: DrawState,
    stack: Vec<DrawState>,
    blend_starts: Vec<(BlendMode, u32)>,
    layer_starts: Vec<(DrawLayer, u32)>,
    /// Layer most recently opened with `begin_layer`.
    layer: DrawLayer,
    text_runs: Vec<TextRun>,
}

impl VectorSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
            state: DrawState::default(),
            stack: Vec::new(),
            blend_starts: Vec::new(),
            layer_starts: Vec::new(),
            layer: DrawLayer::Background,
            text_runs: Vec::new(),
        }
    }

    /// Reset buffers and state. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = DrawState::default();
        self.stack.clear();
        self.blend_starts.clear();
        self.layer_starts.clear();
        self.layer = DrawLayer::Background;
        self.text_runs.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Raw pointer to the flat float buffer.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        bytemuck::cast_slice(&self.buffer)
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// Blend ranges covering the whole buffer, in draw order.
    pub fn blend_spans(&self) -> Vec<BlendSpan> {
        let total = self.vertex_count() as u32;
        let mut spans = Vec::with_capacity(self.blend_starts.len() + 1);
        let mut current = (BlendMode::Alpha, 0u32);
        for &(mode, start) in &self.blend_starts {
            if start > current.1 {
                spans.push(BlendSpan { mode: current.0, start: current.1, end: start });
            }
            current = (mode, start);
        }
        if total > current.1 {
            spans.push(BlendSpan { mode: current.0, start: current.1, end: total });
        }
        spans
    }

    /// Layer ranges in draw order. Empty layers are kept so hosts can see
    /// where the game layer sits even when nothing was drawn there.
    pub fn layer_batches(&self) -> Vec<LayerBatch> {
        let total = self.vertex_count() as u32;
        self.layer_starts
            .iter()
            .enumerate()
            .map(|(i, &(layer, start))| {
                let end = self.layer_starts.get(i + 1).map_or(total, |next| next.1);
                LayerBatch { layer, start, end }
            })
            .collect()
    }

    fn lyon_transform(&self) -> Transform {
        let m = self.state.transform;
        Transform::new(
            m.matrix2.x_axis.x,
            m.matrix2.x_axis.y,
            m.matrix2.y_axis.x,
            m.matrix2.y_axis.y,
            m.translation.x,
            m.translation.y,
        )
    }

    /// Average linear scale of the current transform, for widths and radii.
    fn linear_scale(&self) -> f32 {
        let m = self.state.transform.matrix2;
        (m.x_axis.length() + m.y_axis.length()) * 0.5
    }

    /// Map a paint's geometry into surface space.
    fn world_paint(&self, paint: &Paint) -> Paint {
        let t = self.state.transform;
        let s = self.linear_scale();
        match paint {
            Paint::Solid { .. } => paint.clone(),
            Paint::Linear { from, to, gradient } => Paint::Linear {
                from: t.transform_point2(*from),
                to: t.transform_point2(*to),
                gradient: gradient.clone(),
            },
            Paint::Radial { center, inner, outer, gradient } => Paint::Radial {
                center: t.transform_point2(*center),
                inner: inner * s,
                outer: outer * s,
                gradient: gradient.clone(),
            },
        }
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: Path, paint: &Paint) {
        let path = path.transformed(&self.lyon_transform());
        let paint = self.world_paint(paint);
        let ctor = PaintVertexCtor { paint: &paint, alpha: self.state.alpha };
        let result = self.fill_tess.tessellate_path(
            &path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, ctor),
        );
        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }

    fn stroke_path(&mut self, path: Path, width: f32, color: Color) {
        let path = path.transformed(&self.lyon_transform());
        let paint = Paint::from(color);
        let ctor = PaintVertexCtor { paint: &paint, alpha: self.state.alpha };
        let line_width = (width * self.linear_scale()).max(0.01);
        let result = self.stroke_tess.tessellate_path(
            &path,
            &StrokeOptions::tolerance(0.5).with_line_width(line_width),
            &mut BuffersBuilder::new(&mut self.geometry, ctor),
        );
        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }

    fn circle_path(center: Vec2, radius: f32) -> Path {
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        builder.build()
    }

    fn polyline_path(points: &[Vec2], closed: bool) -> Path {
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(closed);
        builder.build()
    }

    /// Soft halo behind a circle when a glow is active.
    fn glow_circle(&mut self, center: Vec2, radius: f32) {
        if let Some((glow, color)) = self.state.glow {
            let halo = Paint::radial(
                center,
                radius,
                radius + glow,
                Gradient::two(color.fade(0.5), color.with_alpha(0.0)),
            );
            self.fill_path(Self::circle_path(center, radius + glow), &halo);
        }
    }

    /// Wide translucent outline behind polygons when a glow is active.
    fn glow_outline(&mut self, points: &[Vec2], closed: bool) {
        if let Some((glow, color)) = self.state.glow {
            self.stroke_path(Self::polyline_path(points, closed), glow, color.fade(0.25));
        }
    }
}

impl Surface for VectorSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            if state.blend != self.state.blend {
                self.blend_starts.push((state.blend, self.vertex_count() as u32));
            }
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn scale(&mut self, factor: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_scale(factor);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        if mode != self.state.blend {
            self.blend_starts.push((mode, self.vertex_count() as u32));
            self.state.blend = mode;
        }
    }

    fn set_glow(&mut self, radius: f32, color: Color) {
        self.state.glow = (radius > 0.0).then_some((radius, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        self.glow_circle(center, radius);
        self.fill_path(Self::circle_path(center, radius), paint);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.stroke_path(Self::circle_path(center, radius), width, color);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_polygon(&rect.corners(), paint);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.stroke_path(Self::polyline_path(&rect.corners(), true), width, color);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return;
        }
        let r = radius.clamp(0.0, rect.size.x.min(rect.size.y) * 0.5);
        let mut builder = Path::builder();
        builder.add_rounded_rectangle(
            &Box2D::new(
                point(rect.pos.x, rect.pos.y),
                point(rect.pos.x + rect.size.x, rect.pos.y + rect.size.y),
            ),
            &BorderRadii::new(r),
            Winding::Positive,
        );
        self.fill_path(builder.build(), paint);
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        self.glow_outline(points, true);
        self.fill_path(Self::polyline_path(points, true), paint);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        self.glow_outline(points, false);
        self.stroke_path(Self::polyline_path(points, false), width, color);
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.text_runs.push(TextRun {
            layer: self.layer,
            text: text.to_string(),
            pos: self.state.transform.transform_point2(pos),
            size: style.size * self.linear_scale(),
            color: style.color.fade(self.state.alpha),
            align: style.align,
            bold: style.bold,
        });
    }

    fn begin_layer(&mut self, layer: DrawLayer) {
        self.layer_starts.push((layer, self.vertex_count() as u32));
        self.layer = layer;
    }
}
