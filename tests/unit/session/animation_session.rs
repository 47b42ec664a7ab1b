use super::*;
use crate::animation::clock::ManualTimeSource;
use crate::effects::params::EffectKind;
use crate::foundation::error::AbstrakError;

fn session(config: AnimationConfig) -> (AnimationSession, ManualTimeSource) {
    let time = ManualTimeSource::new();
    let source = PixelBuffer::filled(10, 10, [50, 100, 150, 255]).unwrap();
    let s = AnimationSession::with_cpu_surface(
        Canvas::new(20, 10).unwrap(),
        source,
        config,
        EffectParams::default(),
        1,
    )
    .unwrap()
    .with_time_source(Box::new(time.clone()))
    .with_scheduler(Box::new(TickQueue::new(Duration::from_millis(100))));
    (s, time)
}

fn config(duration: f64, speed: f64) -> AnimationConfig {
    AnimationConfig {
        duration_secs: duration,
        speed,
        ..AnimationConfig::default()
    }
}

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{a} != {b}");
}

#[test]
fn starts_stopped_with_fit_geometry() {
    let (s, _) = session(config(4.0, 1.0));
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(s.pending_tick(), None);
    let g = s.geometry();
    approx(g.draw_width, 10.0);
    approx(g.draw_x, 5.0);
}

#[test]
fn play_renders_and_schedules_then_ticks_advance() {
    let (mut s, time) = session(config(4.0, 1.0));
    s.play().unwrap();
    assert!(s.is_playing());
    assert!(s.pending_tick().is_some());
    assert!(s.last_motion().is_some());

    time.advance(Duration::from_millis(50));
    assert!(!s.run_pending().unwrap());

    time.advance(Duration::from_millis(950));
    assert!(s.run_pending().unwrap());
    approx(s.current_time(), 1.0);
    approx(s.last_motion().unwrap().opacity, 0.5);
}

#[test]
fn pause_cancels_pending_tick_and_freezes_time() {
    let (mut s, time) = session(config(10.0, 2.0));
    s.play().unwrap();
    time.advance(Duration::from_secs(1));
    s.run_pending().unwrap();
    approx(s.current_time(), 2.0);

    let stale = s.pending_tick().unwrap();
    s.pause();
    assert_eq!(s.state(), PlaybackState::Paused);
    assert_eq!(s.pending_tick(), None);
    time.advance(Duration::from_secs(5));
    assert!(!s.on_tick(stale).unwrap());
    assert!(!s.run_pending().unwrap());
    approx(s.current_time(), 2.0);

    s.play().unwrap();
    approx(s.current_time(), 2.0);
    time.advance(Duration::from_millis(500));
    s.run_pending().unwrap();
    approx(s.current_time(), 3.0);
}

#[test]
fn seek_while_playing_continues_from_the_target_at_the_seek_instant() {
    let (mut s, time) = session(config(10.0, 1.0));
    s.play().unwrap();
    time.advance(Duration::from_secs(1));
    s.run_pending().unwrap();
    approx(s.current_time(), 1.0);

    time.advance(Duration::from_secs(2));
    s.seek(0.5).unwrap();
    approx(s.current_time(), 0.5);
    assert!(s.is_playing());

    time.advance(Duration::from_millis(500));
    s.run_pending().unwrap();
    approx(s.current_time(), 1.0);
}

#[test]
fn reset_stops_at_zero_and_renders_transparent_fade_frame() {
    let (mut s, time) = session(config(4.0, 1.0));
    s.play().unwrap();
    time.advance(Duration::from_secs(1));
    s.run_pending().unwrap();

    let motion = s.reset().unwrap();
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(s.current_time(), 0.0);
    assert_eq!(motion.opacity, 0.0);
    assert!(s.read_pixels().data().iter().all(|&b| b == 0));
    assert_eq!(s.pending_tick(), None);
}

#[test]
fn render_at_half_duration_with_fade_is_opaque() {
    let (mut s, _) = session(config(4.0, 1.0));
    let m = s.render_at_time(2.0).unwrap();
    approx(m.opacity, 1.0);
    assert_eq!(m.rotation, 0.0);
    assert_eq!(s.read_pixels().pixel(10, 5).unwrap(), [50, 100, 150, 255]);
    assert_eq!(s.read_pixels().pixel(1, 5).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn geometry_updates_recompute() {
    let (mut s, _) = session(config(4.0, 1.0));
    s.update_scale_mode(ScaleMode::Fill, None).unwrap();
    approx(s.geometry().draw_width, 20.0);
    s.update_scale_mode(ScaleMode::Zoom, Some(2.0)).unwrap();
    approx(s.geometry().draw_width, 40.0);
    s.update_zoom_scale(0.5).unwrap();
    approx(s.geometry().draw_width, 10.0);
    assert!(s.update_zoom_scale(0.0).is_err());
    approx(s.config().zoom_scale, 0.5);

    s.resize(Canvas::new(40, 40).unwrap()).unwrap();
    assert_eq!(s.canvas(), Canvas::new(40, 40).unwrap());
    approx(s.geometry().draw_width, 20.0);
    approx(s.geometry().center_x, 20.0);
}

#[test]
fn timing_updates_keep_playback_state() {
    let (mut s, time) = session(config(10.0, 1.0));
    s.play().unwrap();
    time.advance(Duration::from_secs(6));
    s.run_pending().unwrap();

    s.update_duration(4.0).unwrap();
    assert!(s.is_playing());
    approx(s.current_time(), 2.0);
    s.update_speed(2.0).unwrap();
    assert!(matches!(
        s.update_speed(-1.0),
        Err(AbstrakError::InvalidConfig(_))
    ));
    approx(s.config().speed, 2.0);

    s.update_effects(&[MotionEffect::Zoom, MotionEffect::Zoom, MotionEffect::Fade]);
    assert_eq!(
        s.config().effects,
        vec![MotionEffect::Zoom, MotionEffect::Fade]
    );
}

#[test]
fn effect_updates_reprocess_from_source() {
    let (mut s, _) = session(config(4.0, 1.0));
    let source = s.source().clone();
    s.update_effect(EffectParams {
        kind: EffectKind::Randomize,
        intensity: 1.0,
    })
    .unwrap();
    assert_ne!(s.processed(), &source);
    assert_eq!(s.source(), &source);

    s.update_intensity(0.0).unwrap();
    assert_eq!(s.effect().kind, EffectKind::Randomize);
    assert_eq!(s.processed(), &source);

    let before = s.effect();
    assert!(s.update_intensity(2.0).is_err());
    assert_eq!(s.effect(), before);
}

#[test]
fn water_on_non_square_source_is_rejected_at_construction() {
    let source = PixelBuffer::filled(12, 10, [1, 1, 1, 255]).unwrap();
    let err = AnimationSession::with_cpu_surface(
        Canvas::new(20, 10).unwrap(),
        source,
        AnimationConfig::default(),
        EffectParams {
            kind: EffectKind::Water,
            intensity: 0.5,
        },
        0,
    )
    .unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidDimensions(_)));
}
