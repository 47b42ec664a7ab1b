use super::*;
use crate::animation::clock::{ManualTimeSource, TimeSource};
use crate::animation::config::AnimationConfig;
use crate::animation::clock::PlaybackState;
use crate::effects::params::EffectParams;
use crate::encode::sink::{InMemoryEncoder, InMemoryRecorder};
use crate::foundation::core::Canvas;
use crate::foundation::pixels::PixelBuffer;

fn session() -> (AnimationSession, ManualTimeSource) {
    let time = ManualTimeSource::new();
    let s = AnimationSession::with_cpu_surface(
        Canvas::new(6, 4).unwrap(),
        PixelBuffer::filled(3, 2, [10, 20, 30, 255]).unwrap(),
        AnimationConfig {
            duration_secs: 1.0,
            ..AnimationConfig::default()
        },
        EffectParams::default(),
        0,
    )
    .unwrap()
    .with_time_source(Box::new(time.clone()));
    (s, time)
}

fn config() -> ExportConfig {
    ExportConfig {
        fps: 10,
        ..ExportConfig::default()
    }
}

#[test]
fn available_primary_never_touches_the_recorder() {
    let (mut s, _) = session();
    let mut enc = InMemoryEncoder::new();
    let mut rec = InMemoryRecorder::new();
    let out = export_video(
        &mut s,
        &mut enc,
        &mut rec,
        &config(),
        &mut |_| {},
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(out.path, ExportPath::Primary);
    assert_eq!(out.frames, 10);
    assert_eq!(rec.started_with(), None);
}

#[test]
fn unavailable_primary_falls_back_exactly_once() {
    let (mut s, time) = session();
    let mut enc = InMemoryEncoder::unavailable();
    let mut rec = InMemoryRecorder::new();
    let mut values = Vec::new();
    let out = export_video(
        &mut s,
        &mut enc,
        &mut rec,
        &config(),
        &mut |v| values.push(v),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(out.path, ExportPath::Fallback);
    assert_eq!(enc.frames_received(), 0);
    assert_eq!(enc.configure_calls(), 0);
    assert_eq!(rec.started_with(), Some((6, 4, 10)));
    assert_eq!(out.frames, rec.frames_captured() as u64);
    assert_eq!(out.frames, 10);
    assert!(rec.was_stopped());

    // Real-time capture spans the whole duration on the session clock.
    assert!(time.now() >= Duration::from_secs(1));
    assert!(rec.elapsed().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(s.state(), PlaybackState::Paused);

    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(values.last().copied(), Some(100.0));
}

#[test]
fn encoding_failure_is_not_retried_on_the_fallback() {
    let (mut s, _) = session();
    let mut enc = InMemoryEncoder::failing_at(2);
    let mut rec = InMemoryRecorder::new();
    let err = export_video(
        &mut s,
        &mut enc,
        &mut rec,
        &config(),
        &mut |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, AbstrakError::EncodingFailed(_)));
    assert_eq!(rec.started_with(), None);
}

#[test]
fn invalid_config_fails_before_probing() {
    let (mut s, _) = session();
    let mut enc = InMemoryEncoder::unavailable();
    let mut rec = InMemoryRecorder::new();
    let err = export_video(
        &mut s,
        &mut enc,
        &mut rec,
        &ExportConfig {
            fps: 0,
            ..ExportConfig::default()
        },
        &mut |_| {},
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidConfig(_)));
    assert_eq!(rec.started_with(), None);
}

#[test]
fn cancelled_fallback_returns_no_artifact_and_pauses() {
    let (mut s, _) = session();
    let mut rec = InMemoryRecorder::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = record_realtime(&mut s, &mut rec, 10, 1.0, &mut |_| {}, &cancel).unwrap_err();
    assert!(matches!(err, AbstrakError::Cancelled));
    assert!(!rec.was_stopped());
    assert!(!s.is_playing());
}

#[test]
fn fallback_frames_show_live_playback() {
    let (mut s, _) = session();
    let mut rec = InMemoryRecorder::new();
    let (video, frames) =
        record_realtime(&mut s, &mut rec, 10, 1.0, &mut |_| {}, &CancelToken::new()).unwrap();
    assert_eq!(frames, 10);
    assert_eq!(video.bytes.len(), 10 * 6 * 4 * 4);
    // First sample is the reset frame: fade at progress 0 is fully transparent.
    assert!(video.bytes[..6 * 4 * 4].iter().all(|&b| b == 0));
    // Later samples caught the image fading in.
    assert!(video.bytes[6 * 4 * 4..].iter().any(|&b| b != 0));
}
