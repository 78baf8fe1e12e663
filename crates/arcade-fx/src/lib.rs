pub mod api;
pub mod background;
pub mod color;
pub mod compositor;
pub mod core;
pub mod effects;
pub mod particles;
pub mod renderer;
pub mod shake;
pub mod transitions;
pub mod ui;

// Re-export key types at crate root for convenience
pub use api::{GameState, PowerupKind};
pub use background::ParallaxBackground;
pub use color::{Color, ColorParseError};
pub use compositor::EffectsCompositor;
pub use crate::core::config::FxConfig;
pub use crate::core::error::UnknownName;
pub use crate::core::rng::Rng;
pub use crate::core::schedule::DelayQueue;
pub use effects::{EffectInstance, EffectKind, EffectLibrary};
pub use particles::{EmitConfig, EmitterConfig, Particle, ParticleColor, ParticleEngine, ParticleShape};
pub use renderer::{BlendMode, DrawCommand, DrawLayer, DrawList, Gradient, Paint, Rect, Surface, TextAlign, TextStyle};
pub use shake::ScreenShake;
pub use transitions::{Callback, TransitionKind, TransitionMachine, TransitionStep};
pub use ui::{Easing, FloatingText, Notification, UiLayer};

#[cfg(feature = "vectors")]
pub use renderer::{TextRun, VectorSurface, VectorVertex};
