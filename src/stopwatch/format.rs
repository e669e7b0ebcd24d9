use std::time::Duration;

/// Readout shown by a stopwatch that has never run.
pub const ZERO_READOUT: &str = "00:00:00.00";

/// Format an elapsed duration as `HH:MM:SS.ff`.
///
/// Hours are padded to two digits but never capped. The fraction is hundredths
/// of a second, truncated.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hundredths = elapsed.subsec_millis() / 10;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{hundredths:02}")
}
