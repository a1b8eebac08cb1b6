//! Time and timestamp helpers.

use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for `created_at`, delivery times, etc.
pub type Timestamp = DateTime<Utc>;

/// Server-local timestamp. Schedule windows are expressed in the server's
/// local time-of-day, so the dispatcher works with this type.
pub type LocalTimestamp = DateTime<Local>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current server-local time.
#[must_use]
pub fn local_now() -> LocalTimestamp {
    Local::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_agree_with_utc_up_to_offset() {
        let local = local_now();
        let utc = now();
        let drift = (utc - local.with_timezone(&Utc)).num_seconds().abs();
        assert!(drift < 5);
    }
}
