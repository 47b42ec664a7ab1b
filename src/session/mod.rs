//! Animation sessions, offline frame pipeline and video export.

pub mod animation_session;
pub mod config;
pub mod export;
pub mod frame_pipeline;

pub use animation_session::AnimationSession;
pub use config::{ExportConfig, SessionConfig};
pub use export::{ExportOutcome, ExportPath, export_video, record_realtime};
pub use frame_pipeline::{CancelToken, FramePipeline, PipelineStats};
