//! Shared utilities
//!
//! Elapsed-time formatting helpers for log lines.

#![allow(dead_code)]

use std::time::Duration;

/// Format a duration as minutes and whole seconds, e.g. "2m 3s".
///
/// Durations under a minute render as seconds only ("45s").
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    if minutes == 0 {
        format!("{seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// Format a millisecond count as minutes and whole seconds.
pub fn format_elapsed_ms(elapsed_ms: u64) -> String {
    format_elapsed(Duration::from_millis(elapsed_ms))
}
