//! Time utilities for pomo
//!
//! Interval timestamps are wall-clock (`DateTime<Local>`), durations are
//! whole seconds held in `std::time::Duration`.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `POMO_MOCK_TIME` environment variable can be set
//! to override the system time for start timestamps and daily summaries.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)
//!
//! Example:
//! ```bash
//! POMO_MOCK_TIME="2025-12-25 14:30:00" pomo summary
//! ```

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "POMO_MOCK_TIME";

/// Offset between mock time and real time, captured once per process so
/// mock time keeps advancing at the real rate.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => match Local.from_local_datetime(&naive_dt).single() {
                        Some(mock_dt) => {
                            let offset = mock_dt.signed_duration_since(chrono::Local::now());
                            tracing::info!(
                                mock_time = %mock_time_str,
                                offset_secs = offset.num_seconds(),
                                "Mock time enabled"
                            );
                            return Some(offset);
                        }
                        None => tracing::warn!(
                            mock_time = %mock_time_str,
                            "Failed to convert mock time to local timezone"
                        ),
                    },
                    Err(_) => tracing::warn!(
                        mock_time = %mock_time_str,
                        expected_format = "%Y-%m-%d %H:%M:%S",
                        "Invalid mock time format"
                    ),
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)]
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Today's local date.
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// The `count` consecutive days ending at `last`, oldest first.
pub fn days_ending_at(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as u64)
        .rev()
        .filter_map(|back| last.checked_sub_days(Days::new(back)))
        .collect()
}

/// Store-friendly day key (`YYYY-MM-DD`).
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Helper to format durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Countdown-style `MM:SS` rendering; minutes keep growing past an hour.
pub fn format_clock(d: Duration) -> String {
    let total_secs = d.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_follows_real_clock_without_mock() {
        if is_mock_time_active() {
            return;
        }
        let drift = (now() - chrono::Local::now()).num_seconds().abs();
        assert!(drift <= 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(format_clock(Duration::from_secs(4 * 60 + 7)), "04:07");
        assert_eq!(format_clock(Duration::from_secs(61 * 60)), "61:00");
    }

    #[test]
    fn test_days_ending_at() {
        let last = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let days = days_ending_at(last, 3);

        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                last,
            ]
        );
        assert!(days_ending_at(last, 0).is_empty());
    }

    #[test]
    fn test_day_key() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        assert_eq!(day_key(day), "2025-12-05");
    }
}
