// src/utils/time.rs

use chrono::Utc;

/// Current timestamp in milliseconds since Unix epoch
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Millisecond cutoff for a lookback window of `days` days from now
pub fn window_cutoff_ms(days: u32) -> i64 {
    current_timestamp_ms() - (days as i64) * 86_400_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_cutoff_is_in_the_past() {
        let now = current_timestamp_ms();
        let cutoff = window_cutoff_ms(7);
        assert!(cutoff < now);
        assert!(now - cutoff >= 7 * 86_400_000);
    }
}
