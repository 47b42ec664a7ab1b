//! Encoding backends.
//!
//! Encoders consume timestamped frames in order and return an opaque, container-tagged artifact.

/// `ffmpeg`-based MP4 encoder and WebM recorder.
pub mod ffmpeg;
/// Pure-Rust animated GIF recorder.
pub mod gif;
/// Encoder and recorder traits with in-memory implementations.
pub mod sink;

pub use ffmpeg::{FfmpegEncoder, FfmpegRecorder};
pub use gif::GifRecorder;
pub use sink::{
    EncodedVideo, Encoder, EncoderConfig, InMemoryEncoder, InMemoryRecorder, Recorder,
};
