use std::time::Duration;

use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::pixels::PixelBuffer;

/// Default codec string (H.264 constrained baseline, level 3.0).
pub const DEFAULT_CODEC: &str = "avc1.42001E";
/// Default target bitrate.
pub const DEFAULT_BITRATE_BPS: u64 = 2_000_000;

/// Configuration handed to [`Encoder::configure`] before the first frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Codec string, e.g. `avc1.42001E`.
    pub codec: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Nominal frame rate of the stream.
    pub fps: u32,
}

impl EncoderConfig {
    pub fn validate(&self) -> AbstrakResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AbstrakError::invalid_dimensions(format!(
                "encoder size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(AbstrakError::invalid_config("encoder fps must be non-zero"));
        }
        if self.bitrate_bps == 0 {
            return Err(AbstrakError::invalid_config("encoder bitrate must be non-zero"));
        }
        Ok(())
    }
}

/// Opaque encoded artifact tagged with `container/codec`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedVideo {
    /// Container and codec, e.g. `mp4/h264`, `webm/vp9`, `gif/gif`.
    pub container: String,
    /// The complete encoded file.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for EncodedVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedVideo")
            .field("container", &self.container)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl EncodedVideo {
    pub fn new(container: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            container: container.into(),
            bytes,
        }
    }

    /// File extension matching the container half of the tag.
    pub fn extension(&self) -> &str {
        self.container.split('/').next().unwrap_or("bin")
    }
}

/// Primary encoding capability: timestamped raw frames in, encoded bytes out.
///
/// Ordering contract: `encode_frame` is called with strictly increasing timestamps, after exactly
/// one successful `configure`, and `close` is called once after `flush`.
pub trait Encoder: Send {
    /// `Err(EncoderUnavailable)` when the capability is missing on this system.
    fn probe(&self) -> AbstrakResult<()>;
    fn configure(&mut self, cfg: &EncoderConfig) -> AbstrakResult<()>;
    fn encode_frame(&mut self, frame: &PixelBuffer, timestamp_micros: u64) -> AbstrakResult<()>;
    fn flush(&mut self) -> AbstrakResult<()>;
    /// Finish the stream and hand back every encoded byte.
    fn close(&mut self) -> AbstrakResult<EncodedVideo>;
    /// Tear down after a failure. Nothing is returned.
    fn abort(&mut self);
}

/// Generic real-time recording capability used by the fallback path.
///
/// Frames arrive at whatever wall-clock offsets the surface was sampled at.
pub trait Recorder: Send {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> AbstrakResult<()>;
    fn capture(&mut self, frame: &PixelBuffer, elapsed: Duration) -> AbstrakResult<()>;
    fn stop(&mut self) -> AbstrakResult<EncodedVideo>;
}

/// Check a frame against the configured size.
pub(crate) fn check_frame_size(frame: &PixelBuffer, width: u32, height: u32) -> AbstrakResult<()> {
    if frame.width() != width || frame.height() != height {
        return Err(AbstrakError::invalid_dimensions(format!(
            "frame size mismatch: got {}x{}, expected {width}x{height}",
            frame.width(),
            frame.height()
        )));
    }
    frame.validate()
}

/// In-memory [`Encoder`] for tests and debugging.
///
/// Stores raw frames back to back; `close` returns them tagged `raw/rgba`.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    unavailable: bool,
    fail_at: Option<usize>,
    cfg: Option<EncoderConfig>,
    timestamps: Vec<u64>,
    bytes: Vec<u8>,
    configure_calls: usize,
    flushed: bool,
    closed: bool,
    aborted: bool,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder whose probe reports `EncoderUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Encoder that fails with `EncodingFailed` on the frame with 0-based position `n`.
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::default()
        }
    }

    pub fn config(&self) -> Option<&EncoderConfig> {
        self.cfg.as_ref()
    }

    /// Timestamps received, in call order.
    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn frames_received(&self) -> usize {
        self.timestamps.len()
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls
    }

    pub fn was_flushed(&self) -> bool {
        self.flushed
    }

    pub fn was_closed(&self) -> bool {
        self.closed
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl Encoder for InMemoryEncoder {
    fn probe(&self) -> AbstrakResult<()> {
        if self.unavailable {
            return Err(AbstrakError::encoder_unavailable(
                "in-memory encoder configured as unavailable",
            ));
        }
        Ok(())
    }

    fn configure(&mut self, cfg: &EncoderConfig) -> AbstrakResult<()> {
        self.probe()?;
        cfg.validate()?;
        self.configure_calls += 1;
        self.cfg = Some(cfg.clone());
        self.timestamps.clear();
        self.bytes.clear();
        Ok(())
    }

    fn encode_frame(&mut self, frame: &PixelBuffer, timestamp_micros: u64) -> AbstrakResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| AbstrakError::encoding_failed("encoder not configured"))?;
        check_frame_size(frame, cfg.width, cfg.height)?;
        if let Some(&last) = self.timestamps.last()
            && timestamp_micros <= last
        {
            return Err(AbstrakError::encoding_failed(format!(
                "non-monotonic timestamp {timestamp_micros} after {last}"
            )));
        }
        if self.fail_at == Some(self.timestamps.len()) {
            return Err(AbstrakError::encoding_failed(format!(
                "injected failure at frame {}",
                self.timestamps.len()
            )));
        }
        self.timestamps.push(timestamp_micros);
        self.bytes.extend_from_slice(frame.data());
        Ok(())
    }

    fn flush(&mut self) -> AbstrakResult<()> {
        self.flushed = true;
        Ok(())
    }

    fn close(&mut self) -> AbstrakResult<EncodedVideo> {
        if self.cfg.is_none() {
            return Err(AbstrakError::encoding_failed("encoder not configured"));
        }
        self.closed = true;
        Ok(EncodedVideo::new("raw/rgba", std::mem::take(&mut self.bytes)))
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.bytes.clear();
    }
}

/// In-memory [`Recorder`] for tests.
#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    started: Option<(u32, u32, u32)>,
    elapsed: Vec<Duration>,
    bytes: Vec<u8>,
    stopped: bool,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(width, height, fps)` passed to `start`.
    pub fn started_with(&self) -> Option<(u32, u32, u32)> {
        self.started
    }

    /// Wall-clock offsets of captured frames.
    pub fn elapsed(&self) -> &[Duration] {
        &self.elapsed
    }

    pub fn frames_captured(&self) -> usize {
        self.elapsed.len()
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped
    }
}

impl Recorder for InMemoryRecorder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> AbstrakResult<()> {
        if fps == 0 {
            return Err(AbstrakError::invalid_config("recorder fps must be non-zero"));
        }
        self.started = Some((width, height, fps));
        self.elapsed.clear();
        self.bytes.clear();
        self.stopped = false;
        Ok(())
    }

    fn capture(&mut self, frame: &PixelBuffer, elapsed: Duration) -> AbstrakResult<()> {
        let (w, h, _) = self
            .started
            .ok_or_else(|| AbstrakError::encoding_failed("recorder not started"))?;
        check_frame_size(frame, w, h)?;
        self.elapsed.push(elapsed);
        self.bytes.extend_from_slice(frame.data());
        Ok(())
    }

    fn stop(&mut self) -> AbstrakResult<EncodedVideo> {
        if self.started.is_none() {
            return Err(AbstrakError::encoding_failed("recorder not started"));
        }
        self.stopped = true;
        Ok(EncodedVideo::new("raw/rgba", std::mem::take(&mut self.bytes)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
