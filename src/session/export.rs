use std::time::Duration;

use crate::encode::sink::{EncodedVideo, Encoder, Recorder};
use crate::foundation::core::frame_count;
use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::session::animation_session::AnimationSession;
use crate::session::config::ExportConfig;
use crate::session::frame_pipeline::{CancelToken, FramePipeline, Progress};

/// Which encoding path produced an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportPath {
    /// Deterministic offline pipeline through the primary encoder.
    Primary,
    /// Wall-clock recording of live playback.
    Fallback,
}

/// Result of [`export_video`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    pub video: EncodedVideo,
    pub path: ExportPath,
    /// Frames handed to the encoder or recorder.
    pub frames: u64,
}

/// Export `session` as video.
///
/// The primary encoder is probed once. If it (or its configuration) reports
/// `EncoderUnavailable`, the animation is recorded in real time through `fallback` instead; that
/// switch happens before any frame reaches the primary encoder, and happens at most once. Every
/// other error is returned as is.
#[tracing::instrument(skip_all, fields(fps = config.fps))]
pub fn export_video(
    session: &mut AnimationSession,
    primary: &mut dyn Encoder,
    fallback: &mut dyn Recorder,
    config: &ExportConfig,
    progress: &mut dyn FnMut(f64),
    cancel: &CancelToken,
) -> AbstrakResult<ExportOutcome> {
    let pipeline = FramePipeline::new(config.clone())?;

    let primary_res = match primary.probe() {
        Ok(()) => pipeline.generate(session, primary, progress, cancel),
        Err(e) => Err(e),
    };
    match primary_res {
        Ok((video, stats)) => Ok(ExportOutcome {
            video,
            path: ExportPath::Primary,
            frames: stats.frames_encoded,
        }),
        Err(AbstrakError::EncoderUnavailable(reason)) => {
            tracing::warn!(%reason, "primary encoder unavailable, recording in real time");
            let duration = config.resolved_duration(session.config().duration_secs);
            let (video, frames) =
                record_realtime(session, fallback, config.fps, duration, progress, cancel)?;
            Ok(ExportOutcome {
                video,
                path: ExportPath::Fallback,
                frames,
            })
        }
        Err(e) => Err(e),
    }
}

/// Record live playback for `duration_secs` of wall-clock time.
///
/// The session is reset and played; the surface is sampled every `1 / fps` seconds of the
/// session's time source and whatever it shows at that moment is captured. Playback is paused
/// again before returning, on success and on error.
#[tracing::instrument(skip(session, recorder, progress, cancel))]
pub fn record_realtime(
    session: &mut AnimationSession,
    recorder: &mut dyn Recorder,
    fps: u32,
    duration_secs: f64,
    progress: &mut dyn FnMut(f64),
    cancel: &CancelToken,
) -> AbstrakResult<(EncodedVideo, u64)> {
    if fps == 0 {
        return Err(AbstrakError::invalid_config("fps must be > 0"));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(AbstrakError::invalid_config(format!(
            "duration must be finite and > 0, got {duration_secs}"
        )));
    }

    let canvas = session.canvas();
    recorder.start(canvas.width, canvas.height, fps)?;

    let mut progress = Progress::new(progress);
    let res = capture_loop(session, recorder, fps, duration_secs, &mut progress, cancel);
    session.pause();
    let frames = res?;

    let video = recorder.stop()?;
    progress.finish();
    tracing::debug!(frames, container = %video.container, "real-time recording finished");
    Ok((video, frames))
}

fn capture_loop(
    session: &mut AnimationSession,
    recorder: &mut dyn Recorder,
    fps: u32,
    duration_secs: f64,
    progress: &mut Progress<'_>,
    cancel: &CancelToken,
) -> AbstrakResult<u64> {
    let total = frame_count(fps, duration_secs).max(1);
    let length = Duration::from_secs_f64(duration_secs);

    session.reset()?;
    session.play()?;
    let start = session.now();

    let mut captured = 0u64;
    for k in 0..total {
        cancel.check()?;
        let target = Duration::from_secs_f64(k as f64 / f64::from(fps));
        let elapsed = session.now().saturating_sub(start);
        if target > elapsed {
            session.sleep(target - elapsed);
        }
        let elapsed = session.now().saturating_sub(start);
        if k > 0 && elapsed >= length {
            break;
        }
        session.run_pending()?;
        recorder.capture(&session.read_pixels(), elapsed)?;
        captured += 1;
        progress.report(100.0 * elapsed.as_secs_f64() / duration_secs);
    }

    let elapsed = session.now().saturating_sub(start);
    if length > elapsed {
        session.sleep(length - elapsed);
    }
    Ok(captured)
}

#[cfg(test)]
#[path = "../../tests/unit/session/export.rs"]
mod tests;
