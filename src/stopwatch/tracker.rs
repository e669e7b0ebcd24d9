use std::time::{Duration, Instant};

/// Elapsed-time bookkeeping for a single stopwatch.
///
/// Time is committed to `accumulated` only when the tracker is stopped or
/// reset. While running, the open segment is measured from `segment_start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracker {
    accumulated: Duration,
    segment_start: Option<Instant>,
}

impl Tracker {
    /// A paused tracker with nothing accumulated.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            segment_start: None,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Time committed by completed segments since the last reset.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Open a new segment at `now`.
    ///
    /// Returns `false` and leaves the open segment untouched if the tracker is
    /// already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.segment_start = Some(now);
        true
    }

    /// Close the open segment at `now` and fold it into the accumulated time.
    ///
    /// Returns `false` if the tracker was not running.
    pub fn stop(&mut self, now: Instant) -> bool {
        let Some(start) = self.segment_start.take() else {
            return false;
        };
        self.accumulated += now.saturating_duration_since(start);
        true
    }

    /// Zero the accumulated time.
    ///
    /// A running tracker keeps running: its segment restarts at `now`, so the
    /// elapsed time counts up again from zero.
    pub fn reset(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        if self.segment_start.is_some() {
            self.segment_start = Some(now);
        }
    }

    /// Stop if running, start otherwise. Returns the new running state.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_running() {
            self.stop(now);
        } else {
            self.start(now);
        }
        self.is_running()
    }

    /// Elapsed time as of `now`.
    #[must_use]
    pub fn sample(&self, now: Instant) -> Duration {
        match self.segment_start {
            Some(start) => self.accumulated + now.saturating_duration_since(start),
            None => self.accumulated,
        }
    }
}
