pub mod layer;
pub mod recording;
pub mod surface;
#[cfg(feature = "vectors")]
pub mod vector;

pub use layer::DrawLayer;
pub use recording::{DrawCommand, DrawList};
pub use surface::{BlendMode, Gradient, Paint, Rect, Surface, TextAlign, TextStyle};
#[cfg(feature = "vectors")]
pub use vector::{BlendSpan, LayerBatch, TextRun, VectorSurface, VectorVertex};
