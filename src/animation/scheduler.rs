use std::collections::VecDeque;
use std::time::Duration;

/// Handle for one requested tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

/// Display-refresh style continuation: each handled tick requests the next one.
///
/// Implementations decide when a tick is due; the session only requests, cancels and polls.
pub trait FrameScheduler: Send {
    /// Schedule one tick after `now`.
    fn request_tick(&mut self, now: Duration) -> TickId;
    /// Drop a pending tick. Returns `false` if it was unknown or already taken.
    fn cancel(&mut self, id: TickId) -> bool;
    /// Earliest pending tick and its due time.
    fn next_due(&self) -> Option<(TickId, Duration)>;
    /// Remove and return the earliest tick due at or before `now`.
    fn take_due(&mut self, now: Duration) -> Option<TickId>;
    /// Number of pending ticks.
    fn pending(&self) -> usize;
}

/// Fixed-interval [`FrameScheduler`] backed by a FIFO queue.
#[derive(Debug)]
pub struct TickQueue {
    interval: Duration,
    next_id: u64,
    queue: VecDeque<(TickId, Duration)>,
}

impl TickQueue {
    /// Queue ticking every `interval` (a zero interval makes every tick immediately due).
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            queue: VecDeque::new(),
        }
    }

    /// Queue ticking at `hz` times per second (at least 1).
    pub fn with_rate(hz: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / f64::from(hz.max(1))))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for TickQueue {
    fn default() -> Self {
        Self::with_rate(60)
    }
}

impl FrameScheduler for TickQueue {
    fn request_tick(&mut self, now: Duration) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        let due = now + self.interval;
        // Due times are non-decreasing for monotonic `now`, keep FIFO order anyway.
        let at = self
            .queue
            .iter()
            .position(|(_, d)| *d > due)
            .unwrap_or(self.queue.len());
        self.queue.insert(at, (id, due));
        id
    }

    fn cancel(&mut self, id: TickId) -> bool {
        match self.queue.iter().position(|(t, _)| *t == id) {
            Some(i) => {
                self.queue.remove(i);
                true
            }
            None => false,
        }
    }

    fn next_due(&self) -> Option<(TickId, Duration)> {
        self.queue.front().copied()
    }

    fn take_due(&mut self, now: Duration) -> Option<TickId> {
        match self.queue.front() {
            Some((_, due)) if *due <= now => self.queue.pop_front().map(|(id, _)| id),
            _ => None,
        }
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
