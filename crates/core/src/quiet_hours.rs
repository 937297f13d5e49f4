//! Quiet-hours policy
//!
//! During quiet hours the scheduler makes no provider calls and does not
//! touch the display. The window is `[start, end)` in whole hours and wraps
//! around midnight when `start > end` (22..6 means 22:00 to 06:00).
//! `start == end` is an empty window.

use chrono::Timelike;
use std::time::Duration;

use crate::error::ConfigError;

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Whether `current_hour` falls inside the `[start_hour, end_hour)` window
pub fn is_quiet(current_hour: u32, start_hour: u32, end_hour: u32) -> bool {
    if start_hour == end_hour {
        false
    } else if start_hour < end_hour {
        start_hour <= current_hour && current_hour < end_hour
    } else {
        current_hour >= start_hour || current_hour < end_hour
    }
}

/// A validated quiet-hours window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    start_hour: u32,
    end_hour: u32,
}

impl QuietHours {
    /// Build a window from two hours in 0..=23
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        if start_hour > 23 {
            return Err(ConfigError::invalid(
                "QUIET_START_HOUR",
                start_hour.to_string(),
                "hour must be between 0 and 23",
            ));
        }
        if end_hour > 23 {
            return Err(ConfigError::invalid(
                "QUIET_END_HOUR",
                end_hour.to_string(),
                "hour must be between 0 and 23",
            ));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Whether the given wall-clock time is inside the window
    pub fn contains<T: Timelike>(&self, now: &T) -> bool {
        is_quiet(now.hour(), self.start_hour, self.end_hour)
    }

    /// Time left until the window ends, or `None` when not quiet
    pub fn remaining<T: Timelike>(&self, now: &T) -> Option<Duration> {
        if !self.contains(now) {
            return None;
        }
        let now_secs = (now.hour() * 3600 + now.minute() * 60 + now.second()) as i64;
        let end_secs = (self.end_hour * 3600) as i64;
        let left = (end_secs - now_secs).rem_euclid(SECONDS_PER_DAY);
        Some(Duration::from_secs(left as u64))
    }
}

impl std::fmt::Display for QuietHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_documented_examples() {
        assert!(is_quiet(3, 1, 6));
        assert!(is_quiet(22, 22, 6));
        assert!(!is_quiet(10, 22, 6));
    }

    #[test]
    fn test_same_day_window_bounds() {
        assert!(!is_quiet(0, 1, 6));
        assert!(is_quiet(1, 1, 6));
        assert!(is_quiet(5, 1, 6));
        // End hour is exclusive
        assert!(!is_quiet(6, 1, 6));
    }

    #[test]
    fn test_wraparound_window() {
        for hour in [22, 23, 0, 1, 5] {
            assert!(is_quiet(hour, 22, 6), "hour {} should be quiet", hour);
        }
        for hour in [6, 7, 12, 21] {
            assert!(!is_quiet(hour, 22, 6), "hour {} should not be quiet", hour);
        }
    }

    #[test]
    fn test_empty_window() {
        for hour in 0..24 {
            assert!(!is_quiet(hour, 4, 4));
        }
    }

    #[test]
    fn test_matches_interval_membership_for_all_hours() {
        for start in 0..24u32 {
            for end in 0..24u32 {
                for hour in 0..24u32 {
                    // Walk forward from start until end; hour is inside iff reached first
                    let mut inside = false;
                    let mut h = start;
                    while h != end {
                        if h == hour {
                            inside = true;
                            break;
                        }
                        h = (h + 1) % 24;
                    }
                    assert_eq!(is_quiet(hour, start, end), inside, "{} in [{}, {})", hour, start, end);
                }
            }
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(QuietHours::new(24, 6).is_err());
        assert!(QuietHours::new(1, 30).is_err());
        assert!(QuietHours::new(23, 0).is_ok());
    }

    #[test]
    fn test_remaining_until_end() {
        let quiet = QuietHours::new(22, 6).unwrap();
        let late = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        assert_eq!(quiet.remaining(&late), Some(Duration::from_secs(6 * 3600 + 30 * 60)));

        let early = NaiveTime::from_hms_opt(5, 59, 30).unwrap();
        assert_eq!(quiet.remaining(&early), Some(Duration::from_secs(30)));

        let day = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(quiet.remaining(&day), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(QuietHours::new(1, 6).unwrap().to_string(), "01:00-06:00");
    }
}
