//! Abstrak generates abstract images, runs pixel-space effects over them and animates the result
//! with looping motion, exporting video through `ffmpeg` or a real-time fallback recorder.
//!
//! - Generate or load a source [`PixelBuffer`]
//! - Build an [`AnimationSession`] with an [`AnimationConfig`] and [`EffectParams`]
//! - Play it interactively, or [`export_video`] it
#![forbid(unsafe_code)]

mod foundation;

/// Playback clock, motion configuration, geometry and frame scheduling.
pub mod animation;
/// Pixel-space effect kernels.
pub mod effects;
/// Encoders and recorders.
pub mod encode;
/// Source image generation and decoding.
pub mod generate;
/// Drawing surfaces and the compositor.
pub mod render;
/// Animation sessions and video export.
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, FrameIndex, Point, Rect, Vec2, frame_count};
pub use crate::foundation::error::{AbstrakError, AbstrakResult};
pub use crate::foundation::pixels::PixelBuffer;

pub use crate::animation::{
    AnimationClock, AnimationConfig, FrameScheduler, Geometry, ManualTimeSource, MotionEffect,
    PlaybackState, ScaleMode, SystemTimeSource, TickId, TickQueue, TimeSource,
};
pub use crate::effects::{EffectKind, EffectParams};
pub use crate::encode::{
    EncodedVideo, Encoder, EncoderConfig, FfmpegEncoder, FfmpegRecorder, GifRecorder,
    InMemoryEncoder, InMemoryRecorder, Recorder,
};
pub use crate::generate::{ShapeGenerator, decode_image, encode_png, load_image};
pub use crate::render::{AppliedMotion, Compositor, CpuSurface, Surface};
pub use crate::session::{
    AnimationSession, CancelToken, ExportConfig, ExportOutcome, ExportPath, FramePipeline,
    PipelineStats, SessionConfig, export_video, record_realtime,
};
