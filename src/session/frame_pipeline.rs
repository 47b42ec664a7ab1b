use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::encode::sink::{EncodedVideo, Encoder, EncoderConfig};
use crate::foundation::core::{FrameIndex, frame_count};
use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::pixels::PixelBuffer;
use crate::session::animation_session::AnimationSession;
use crate::session::config::ExportConfig;

/// Cooperative cancellation flag, polled once per frame boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn check(&self) -> AbstrakResult<()> {
        if self.is_cancelled() {
            return Err(AbstrakError::Cancelled);
        }
        Ok(())
    }
}

/// Highest value reported before the artifact exists.
const PENDING_CEILING: f64 = 99.0;

/// Monotonic progress reporter in `[0, 100]`. Only [`Progress::finish`] reaches 100.
pub(crate) struct Progress<'a> {
    callback: &'a mut dyn FnMut(f64),
    last: f64,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(callback: &'a mut dyn FnMut(f64)) -> Self {
        Self {
            callback,
            last: 0.0,
        }
    }

    pub(crate) fn report(&mut self, value: f64) {
        let value = value.clamp(0.0, PENDING_CEILING).max(self.last);
        self.last = value;
        (self.callback)(value);
    }

    pub(crate) fn finish(&mut self) {
        self.last = 100.0;
        (self.callback)(100.0);
    }
}

/// Frames may already be in the encoder, so a late `EncoderUnavailable` must not trigger a
/// fallback that would record them again.
fn mid_stream(err: AbstrakError) -> AbstrakError {
    match err {
        AbstrakError::EncoderUnavailable(reason) => AbstrakError::encoding_failed(format!(
            "encoder became unavailable mid-stream: {reason}"
        )),
        other => other,
    }
}

enum FrameMsg {
    Frame {
        raster: PixelBuffer,
        timestamp_micros: u64,
    },
    Finish,
}

/// Statistics of one offline pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_captured: u64,
    pub frames_encoded: u64,
}

/// Deterministic offline capture and encode.
///
/// Capture runs on the calling thread, forcing the session clock to `index / fps` for each
/// frame. Encoding runs on a scoped worker fed through a bounded channel, so at most
/// `channel_capacity + 2` rasters are alive at once. Capture contributes the first 50 progress
/// points and encoding the second 50, capped at 99 until `close` returns the artifact.
#[derive(Clone, Debug, Default)]
pub struct FramePipeline {
    config: ExportConfig,
}

impl FramePipeline {
    pub fn new(config: ExportConfig) -> AbstrakResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encoder configuration for `session`'s canvas.
    pub fn encoder_config(&self, session: &AnimationSession) -> EncoderConfig {
        let canvas = session.canvas();
        EncoderConfig {
            codec: self.config.codec.clone(),
            width: canvas.width,
            height: canvas.height,
            bitrate_bps: self.config.bitrate_bps,
            fps: self.config.fps,
        }
    }

    /// Number of frames this pipeline would produce for `session`.
    pub fn total_frames(&self, session: &AnimationSession) -> u64 {
        frame_count(
            self.config.fps,
            self.config
                .resolved_duration(session.config().duration_secs),
        )
    }

    /// Render and encode every frame, returning the encoder's artifact.
    ///
    /// `EncoderUnavailable` from `configure` is returned before any frame is captured. Any
    /// encoder error aborts the run with no artifact. The session is paused for the duration of
    /// the run and resumed afterwards if it was playing.
    #[tracing::instrument(skip_all, fields(fps = self.config.fps))]
    pub fn generate(
        &self,
        session: &mut AnimationSession,
        encoder: &mut dyn Encoder,
        progress: &mut dyn FnMut(f64),
        cancel: &CancelToken,
    ) -> AbstrakResult<(EncodedVideo, PipelineStats)> {
        self.config.validate()?;
        let fps = self.config.fps;
        let total = self.total_frames(session);
        if total == 0 {
            return Err(AbstrakError::invalid_config(
                "export produces no frames (duration * fps rounds to 0)",
            ));
        }

        encoder.configure(&self.encoder_config(session))?;
        tracing::debug!(total, "encoder configured, starting capture");

        let resume = session.is_playing();
        session.pause();
        let result = self.run(session, encoder, progress, cancel, fps, total);
        if resume {
            session.play()?;
        }
        result
    }

    fn run(
        &self,
        session: &mut AnimationSession,
        encoder: &mut dyn Encoder,
        progress: &mut dyn FnMut(f64),
        cancel: &CancelToken,
        fps: u32,
        total: u64,
    ) -> AbstrakResult<(EncodedVideo, PipelineStats)> {
        let cap = self.config.channel_capacity.max(1);
        let mut progress = Progress::new(progress);
        let weight = 50.0 / total as f64;

        std::thread::scope(|scope| -> AbstrakResult<(EncodedVideo, PipelineStats)> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let (done_tx, done_rx) = mpsc::channel::<u64>();
            let encoder_ref: &mut dyn Encoder = encoder;

            let enc = scope.spawn(move || -> AbstrakResult<Option<EncodedVideo>> {
                let mut encoded = 0u64;
                let outcome = (|| -> AbstrakResult<Option<EncodedVideo>> {
                    while let Ok(msg) = rx.recv() {
                        match msg {
                            FrameMsg::Frame {
                                raster,
                                timestamp_micros,
                            } => {
                                encoder_ref.encode_frame(&raster, timestamp_micros)?;
                                encoded += 1;
                                let _ = done_tx.send(encoded);
                            }
                            FrameMsg::Finish => {
                                encoder_ref.flush()?;
                                return encoder_ref.close().map(Some);
                            }
                        }
                    }
                    Ok(None)
                })();
                match outcome {
                    Ok(Some(video)) => Ok(Some(video)),
                    Ok(None) => {
                        encoder_ref.abort();
                        Ok(None)
                    }
                    Err(e) => {
                        encoder_ref.abort();
                        Err(mid_stream(e))
                    }
                }
            });

            let mut captured = 0u64;
            let mut encoded = 0u64;
            let produce_res = (|| -> AbstrakResult<bool> {
                for i in 0..total {
                    cancel.check()?;
                    let idx = FrameIndex(i);
                    session.render_at_time(idx.time_secs(fps))?;
                    let msg = FrameMsg::Frame {
                        raster: session.read_pixels(),
                        timestamp_micros: idx.timestamp_micros(fps),
                    };
                    if tx.send(msg).is_err() {
                        // Encoder worker stopped; its own error explains why.
                        return Ok(false);
                    }
                    captured += 1;
                    while let Ok(n) = done_rx.try_recv() {
                        encoded = n;
                    }
                    progress.report(captured as f64 * weight + encoded as f64 * weight);
                }
                cancel.check()?;
                Ok(tx.send(FrameMsg::Finish).is_ok())
            })();
            drop(tx);

            if produce_res.is_ok() {
                while let Ok(n) = done_rx.recv() {
                    encoded = n;
                    progress.report(captured as f64 * weight + encoded as f64 * weight);
                }
            }

            let enc_res = enc
                .join()
                .map_err(|_| AbstrakError::encoding_failed("encoder thread panicked"))?;

            let delivered = produce_res?;
            let video = enc_res?;
            match (delivered, video) {
                (true, Some(video)) => {
                    progress.finish();
                    tracing::debug!(captured, encoded, "pipeline finished");
                    Ok((
                        video,
                        PipelineStats {
                            frames_captured: captured,
                            frames_encoded: encoded,
                        },
                    ))
                }
                _ => Err(AbstrakError::encoding_failed(
                    "encoder stopped before the last frame",
                )),
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/frame_pipeline.rs"]
mod tests;
