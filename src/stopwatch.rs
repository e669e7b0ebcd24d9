//! Stopwatch domain: elapsed-time tracking and the collection that routes
//! commands to individual stopwatches.

mod collection;
mod format;
mod tracker;

pub use collection::{Stopwatch, Stopwatches, TrackerCommand};
pub use format::{ZERO_READOUT, format_elapsed};
pub use tracker::Tracker;
