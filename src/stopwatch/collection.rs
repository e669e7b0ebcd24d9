use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

use crate::clock::Clock;
use crate::stopwatch::{Tracker, ZERO_READOUT, format_elapsed};

/// Operation routed to a single stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    Start,
    Stop,
    Reset,
    Toggle,
}

impl TrackerCommand {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Reset => "Reset",
            Self::Toggle => "Toggle",
        }
    }
}

/// A tracker together with the readout last published for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwatch {
    tracker: Tracker,
    readout: String,
}

impl Stopwatch {
    fn new() -> Self {
        Self {
            tracker: Tracker::new(),
            readout: ZERO_READOUT.to_string(),
        }
    }

    #[must_use]
    pub fn readout(&self) -> &str {
        &self.readout
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.tracker.is_running()
    }

    /// Recompute the readout at `now`. Returns whether it changed.
    fn refresh(&mut self, now: Instant) -> bool {
        let readout = format_elapsed(self.tracker.sample(now));
        if readout == self.readout {
            return false;
        }
        self.readout = readout;
        true
    }
}

/// Ordered, growable set of independent stopwatches.
///
/// Readouts are refreshed on every mutation and on [`Stopwatches::tick`].
/// Whether anything visible changed is tracked by a dirty flag that the
/// presentation layer polls with [`Stopwatches::take_dirty`].
pub struct Stopwatches {
    entries: Vec<Stopwatch>,
    clock: Rc<dyn Clock>,
    dirty: bool,
}

impl Stopwatches {
    pub fn new(clock: Rc<dyn Clock>, count: usize) -> Self {
        Self {
            entries: (0..count).map(|_| Stopwatch::new()).collect(),
            clock,
            dirty: true,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stopwatch> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stopwatch> {
        self.entries.iter()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.iter().filter(|s| s.is_running()).count()
    }

    /// Append a fresh, paused stopwatch. Returns its index.
    pub fn add(&mut self) -> usize {
        self.entries.push(Stopwatch::new());
        self.dirty = true;
        debug!(count = self.entries.len(), "Added stopwatch");
        self.entries.len() - 1
    }

    /// Drop the most recently added stopwatch. Returns `false` when empty.
    pub fn remove_last(&mut self) -> bool {
        if self.entries.pop().is_none() {
            return false;
        }
        self.dirty = true;
        debug!(count = self.entries.len(), "Removed last stopwatch");
        true
    }

    /// Apply `command` to the stopwatch at `index`.
    ///
    /// Returns `false` if there is no such stopwatch or the command did not
    /// change its state.
    pub fn dispatch(&mut self, command: TrackerCommand, index: usize) -> bool {
        let now = self.clock.now();
        let Some(entry) = self.entries.get_mut(index) else {
            debug!(?command, index, "Ignoring command for missing stopwatch");
            return false;
        };

        let applied = match command {
            TrackerCommand::Start => entry.tracker.start(now),
            TrackerCommand::Stop => entry.tracker.stop(now),
            TrackerCommand::Reset => {
                entry.tracker.reset(now);
                true
            }
            TrackerCommand::Toggle => {
                entry.tracker.toggle(now);
                true
            }
        };

        if applied {
            debug!(
                ?command,
                index,
                running = entry.is_running(),
                accumulated = ?entry.tracker.accumulated(),
                "Applied command"
            );
        }

        // A state change is visible even when the readout stays the same.
        let refreshed = entry.refresh(now);
        self.dirty |= applied || refreshed;
        applied
    }

    /// Refresh the readout of every running stopwatch at one shared instant.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for entry in self.entries.iter_mut().filter(|e| e.is_running()) {
            self.dirty |= entry.refresh(now);
        }
    }

    /// Whether anything visible changed since the last call. Clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
