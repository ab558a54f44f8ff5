//! Formatting utilities

use chrono::{DateTime, Local, Utc};

/// Format a countdown as zero-padded `mm:ss`
///
/// Minutes are not wrapped into hours, so 90 minutes renders as `90:00`.
pub fn clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format a duration in human-readable form
pub fn duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Format a timestamp as local HH:MM:SS
pub fn time(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_padding() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(5), "00:05");
        assert_eq!(clock(300), "05:00");
        assert_eq!(clock(1499), "24:59");
        assert_eq!(clock(5400), "90:00");
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(42), "42s");
        assert_eq!(duration(1500), "25m 0s");
        assert_eq!(duration(3600 + 15 * 60), "1h 15m");
    }
}
