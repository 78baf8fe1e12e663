pub mod config;
pub mod error;
pub mod rng;
pub mod schedule;

/// One 60 Hz frame in ms. Per-frame motion constants are scaled by
/// `dt / FRAME_MS` so they hold at any frame rate.
pub const FRAME_MS: f32 = 1000.0 / 60.0;
