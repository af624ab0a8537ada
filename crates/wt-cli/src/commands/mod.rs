//! CLI subcommand implementations.

pub mod intervals;
pub mod sync;

use chrono::Duration;

/// Formats a duration as "Xh Ym" or "Ym".
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
