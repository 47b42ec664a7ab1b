use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::animation::config::{validate_duration, validate_speed};
use crate::foundation::error::AbstrakResult;

/// Monotonic time source driving real-time playback.
pub trait TimeSource: Send {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Block (or pretend to) for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall-clock [`TimeSource`] backed by [`Instant`].
#[derive(Debug)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Synthetic [`TimeSource`]: time only moves through [`ManualTimeSource::advance`] or `sleep`.
///
/// Clones share the same clock, so a test can keep a handle while the session owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualTimeSource {
    now: Arc<Mutex<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += d;
    }

    pub fn set(&self, t: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = t;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// Playback state of an [`AnimationClock`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Looping playback clock.
///
/// Times are seconds. `now` arguments come from a [`TimeSource`] and only need to be monotonic;
/// the clock never reads time on its own. While playing, `current_time` is
/// `(elapsed * speed) mod duration`, with `elapsed` measured from a start reference that already
/// accounts for previously accumulated time, so pause then play resumes in place.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    state: PlaybackState,
    duration: f64,
    speed: f64,
    start_ref: Option<f64>,
    current: f64,
    last_now: f64,
}

impl AnimationClock {
    pub fn new(duration_secs: f64, speed: f64) -> AbstrakResult<Self> {
        validate_duration(duration_secs)?;
        validate_speed(speed)?;
        Ok(Self {
            state: PlaybackState::Stopped,
            duration: duration_secs,
            speed,
            start_ref: None,
            current: 0.0,
            last_now: 0.0,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current loop position in `[0, duration)`.
    pub fn current_time(&self) -> f64 {
        self.current
    }

    /// `current_time / duration`, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        self.current / self.duration
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Stopped or Paused -> Playing. No-op while already playing.
    pub fn play(&mut self, now: Duration) {
        if self.is_playing() {
            return;
        }
        let now = now.as_secs_f64();
        self.state = PlaybackState::Playing;
        self.last_now = now;
        self.rebase();
    }

    /// Playing -> Paused, freezing `current_time`. Safe in any state.
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Paused;
        }
    }

    /// Any state -> Stopped at time 0.
    pub fn reset(&mut self) {
        self.state = PlaybackState::Stopped;
        self.start_ref = None;
        self.current = 0.0;
    }

    /// Advance from wall-clock time. Returns the new progress, or `None` when not playing.
    pub fn tick(&mut self, now: Duration) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        let now = now.as_secs_f64();
        self.last_now = now;
        let start = self.start_ref.unwrap_or(now);
        self.current = self.wrap((now - start) * self.speed);
        Some(self.progress())
    }

    /// Jump to `time_secs` (wrapped into `[0, duration)`) in any state.
    ///
    /// While playing, `now` becomes the wall-clock instant at which `time_secs` is reached.
    pub fn seek(&mut self, time_secs: f64, now: Duration) {
        self.current = self.wrap(time_secs);
        if self.is_playing() {
            self.last_now = now.as_secs_f64();
            self.rebase();
        }
    }

    /// Change the loop length, keeping the position wrapped into the new range.
    pub fn set_duration(&mut self, duration_secs: f64) -> AbstrakResult<()> {
        validate_duration(duration_secs)?;
        self.duration = duration_secs;
        self.current = self.wrap(self.current);
        if self.is_playing() {
            self.rebase();
        }
        Ok(())
    }

    /// Change the playback rate without jumping the current position.
    pub fn set_speed(&mut self, speed: f64) -> AbstrakResult<()> {
        validate_speed(speed)?;
        self.speed = speed;
        if self.is_playing() {
            self.rebase();
        }
        Ok(())
    }

    fn rebase(&mut self) {
        self.start_ref = Some(self.last_now - self.current / self.speed);
    }

    fn wrap(&self, t: f64) -> f64 {
        if !t.is_finite() {
            return 0.0;
        }
        let w = t.rem_euclid(self.duration);
        // rem_euclid can round up to exactly `duration` for tiny negative inputs.
        if w >= self.duration { 0.0 } else { w }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
