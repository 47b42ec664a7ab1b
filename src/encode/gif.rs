use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{EncodedVideo, Recorder, check_frame_size};
use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::pixels::PixelBuffer;

/// Quantizer speed passed to the GIF encoder (1 is slowest, 30 fastest).
const GIF_SPEED: i32 = 10;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Pure-Rust fallback recorder producing a looping animated GIF.
///
/// Frame delays follow the wall-clock spacing of the captures; the last frame gets the nominal
/// `1 / fps` delay. One frame is held back until its successor arrives.
#[derive(Default)]
pub struct GifRecorder {
    out: SharedBuf,
    encoder: Option<GifEncoder<SharedBuf>>,
    size: (u32, u32),
    fps: u32,
    pending: Option<(RgbaImage, Duration)>,
    frames: usize,
}

impl GifRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames
    }

    fn emit(&mut self, image: RgbaImage, delay: Duration) -> AbstrakResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| AbstrakError::encoding_failed("gif recorder not started"))?;
        let micros = u32::try_from(delay.as_micros()).unwrap_or(u32::MAX).max(1);
        let frame = Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(micros, 1000));
        encoder
            .encode_frame(frame)
            .map_err(|e| AbstrakError::encoding_failed(format!("gif frame encode failed: {e}")))?;
        self.frames += 1;
        Ok(())
    }
}

impl Recorder for GifRecorder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> AbstrakResult<()> {
        if fps == 0 {
            return Err(AbstrakError::invalid_config("recorder fps must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(AbstrakError::invalid_dimensions(format!(
                "gif frames are limited to 65535x65535, got {width}x{height}"
            )));
        }
        PixelBuffer::expected_len(width, height)?;

        self.out = SharedBuf::default();
        let mut encoder = GifEncoder::new_with_speed(self.out.clone(), GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("configure gif looping")?;
        self.encoder = Some(encoder);
        self.size = (width, height);
        self.fps = fps;
        self.pending = None;
        self.frames = 0;
        Ok(())
    }

    fn capture(&mut self, frame: &PixelBuffer, elapsed: Duration) -> AbstrakResult<()> {
        if self.encoder.is_none() {
            return Err(AbstrakError::encoding_failed("gif recorder not started"));
        }
        check_frame_size(frame, self.size.0, self.size.1)?;
        let image = RgbaImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or_else(|| AbstrakError::invalid_dimensions("frame does not fit an RGBA image"))?;

        if let Some((prev, at)) = self.pending.take() {
            self.emit(prev, elapsed.saturating_sub(at))?;
        }
        self.pending = Some((image, elapsed));
        Ok(())
    }

    fn stop(&mut self) -> AbstrakResult<EncodedVideo> {
        if self.encoder.is_none() {
            return Err(AbstrakError::encoding_failed("gif recorder not started"));
        }
        if let Some((last, _)) = self.pending.take() {
            let nominal = Duration::from_secs_f64(1.0 / f64::from(self.fps));
            self.emit(last, nominal)?;
        }
        // Dropping the encoder writes the trailer.
        drop(self.encoder.take());
        Ok(EncodedVideo::new("gif/gif", self.out.take()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
