//! Pixel-space image kernels.
//!
//! Every kernel reads a source [`PixelBuffer`](crate::PixelBuffer) and returns a new one of the
//! same dimensions, leaving alpha untouched.

pub mod composite;
pub mod glitch;
pub mod oil_paint;
pub mod params;
pub mod randomize;
pub mod water;

pub use params::{EffectKind, EffectParams};
