//! Playback timing and motion configuration.

pub mod clock;
pub mod config;
pub mod geometry;
pub mod scheduler;

pub use clock::{AnimationClock, ManualTimeSource, PlaybackState, SystemTimeSource, TimeSource};
pub use config::{AnimationConfig, MotionEffect, ScaleMode};
pub use geometry::Geometry;
pub use scheduler::{FrameScheduler, TickId, TickQueue};
