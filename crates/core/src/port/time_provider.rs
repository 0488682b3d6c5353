// Time Provider Port (for testability)

use chrono::{Local, TimeZone};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Current local wall-clock time as shown in the feeds (`HH:MM:SS`)
    fn wall_clock(&self) -> String {
        format_wall_clock(self.now_millis())
    }
}

/// Format epoch milliseconds as local `HH:MM:SS`
pub fn format_wall_clock(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_shape() {
        let formatted = SystemTimeProvider.wall_clock();
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }

    #[test]
    fn test_one_second_apart() {
        let a = format_wall_clock(1_700_000_000_000);
        let b = format_wall_clock(1_700_000_001_000);
        assert_ne!(a, b);
        assert_eq!(a[..6], b[..6]);
    }
}
