//! Time window — an hour-of-day range gating whether a rule may fire now.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::LocalTimestamp;

/// An hour-of-day window in the server's local time.
///
/// The window is half-open: `[start_hour, end_hour)`. When
/// `start_hour >= end_hour` the window wraps midnight, e.g. `22 → 6`
/// permits 23:15 and 02:40 but not 10:00. Gating is evaluated against the
/// instant of dispatch, not the event's original timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// First hour inside the window, `0..=23`.
    pub start_hour: u8,
    /// First hour outside the window, `0..=23`.
    pub end_hour: u8,
}

impl TimeWindow {
    /// Create a window after validating both hours.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::HourOutOfRange`] when either hour is
    /// greater than 23.
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self, ValidationError> {
        for hour in [start_hour, end_hour] {
            if hour > 23 {
                return Err(ValidationError::HourOutOfRange(hour));
            }
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Whether the given hour of day falls inside the window.
    #[must_use]
    pub fn permits_hour(&self, hour: u32) -> bool {
        let start = u32::from(self.start_hour);
        let end = u32::from(self.end_hour);
        if start < end {
            // Same-day window.
            start <= hour && hour < end
        } else {
            // Wraps midnight (e.g. 22 → 6). Equal bounds admit every hour.
            hour >= start || hour < end
        }
    }

    /// Whether the window permits execution at the given local instant.
    #[must_use]
    pub fn permits(&self, now: LocalTimestamp) -> bool {
        self.permits_hour(now.hour())
    }
}

/// Schedule gate over an optional window: a rule without a window is never
/// time-gated.
#[must_use]
pub fn is_within_window(window: Option<&TimeWindow>, now: LocalTimestamp) -> bool {
    window.is_none_or(|window| window.permits(now))
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:02}:00..{:02}:00)", self.start_hour, self.end_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::local_now;

    #[test]
    fn should_permit_hours_inside_same_day_window() {
        let window = TimeWindow::new(9, 17).unwrap();
        assert!(window.permits_hour(9));
        assert!(window.permits_hour(12));
        assert!(!window.permits_hour(17), "end hour is exclusive");
        assert!(!window.permits_hour(8));
        assert!(!window.permits_hour(22));
    }

    #[test]
    fn should_wrap_midnight_when_start_is_after_end() {
        let window = TimeWindow::new(22, 6).unwrap();
        assert!(window.permits_hour(23));
        assert!(window.permits_hour(2));
        assert!(window.permits_hour(22));
        assert!(!window.permits_hour(6), "end hour is exclusive");
        assert!(!window.permits_hour(10));
    }

    #[test]
    fn should_permit_every_hour_when_bounds_are_equal() {
        let window = TimeWindow::new(8, 8).unwrap();
        for hour in 0..24 {
            assert!(window.permits_hour(hour));
        }
    }

    #[test]
    fn should_reject_hours_above_23() {
        assert_eq!(
            TimeWindow::new(24, 6),
            Err(ValidationError::HourOutOfRange(24))
        );
        assert_eq!(
            TimeWindow::new(6, 99),
            Err(ValidationError::HourOutOfRange(99))
        );
    }

    #[test]
    fn should_always_pass_gate_when_window_absent() {
        assert!(is_within_window(None, local_now()));
    }

    #[test]
    fn should_gate_on_current_hour_when_window_present() {
        let now = local_now();
        let open = TimeWindow::new(0, 0).unwrap();
        assert!(is_within_window(Some(&open), now));
    }

    #[test]
    fn should_roundtrip_window_through_camel_case_json() {
        let window = TimeWindow::new(22, 6).unwrap();
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json, serde_json::json!({"startHour": 22, "endHour": 6}));
        let parsed: TimeWindow = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn should_display_window_as_half_open_range() {
        let window = TimeWindow::new(9, 17).unwrap();
        assert_eq!(window.to_string(), "[09:00..17:00)");
    }
}
