//! Application-level messages.
//!
//! Terminal events are translated into messages, which are applied one at a
//! time by [`crate::app::App`]. Nothing mutates a stopwatch except through
//! this queue.

use crate::ui::StopwatchMsg;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    // === Lifecycle ===
    /// Periodic tick, refreshes running readouts and the header clock
    Tick,
    /// Draw a frame if anything changed
    Render,
    /// Terminal resized
    Resize(u16, u16),
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Resume from suspension
    Resume,
    /// Quit the application
    Quit,
    /// Clear and redraw the screen
    ClearScreen,

    // === Feedback ===
    /// Show an error in the footer
    DisplayError(String),
    /// Open or close the help overlay
    ToggleHelp,
    /// Switch between the dark and light theme
    ToggleTheme,

    // === Stopwatches ===
    Stopwatch(StopwatchMsg),
}
