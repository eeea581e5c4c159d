/// Reading staleness detection.
///
/// The channel normally updates every few seconds. When the monitor falls
/// back to a cached or last-known reading, the dashboard keeps showing
/// numbers that may be minutes old; a badge reader outage is otherwise not
/// obvious. This module flags those gaps.
///
/// # Clock injection
/// All functions accept a `now: DateTime<Utc>` parameter rather than calling
/// `Utc::now()` internally, which keeps tests deterministic.

use chrono::{DateTime, Utc};

use crate::model::Reading;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Age of a reading in whole seconds. Readings stamped in the future (clock
/// skew between the station and this host) count as zero seconds old.
pub fn age_secs_at(reading: &Reading, now: DateTime<Utc>) -> u64 {
    let age = (now - reading.timestamp).num_seconds();
    u64::try_from(age).unwrap_or(0)
}

/// Returns `true` if the reading is older than `max_age_secs` relative to
/// `now`.
///
/// Staleness is defined as strictly greater than the threshold:
///   age > max_age_secs  →  stale
///   age == max_age_secs →  not stale
///
/// A threshold of zero disables the check.
pub fn is_stale_at(reading: &Reading, max_age_secs: u64, now: DateTime<Utc>) -> bool {
    max_age_secs > 0 && age_secs_at(reading, now) > max_age_secs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// A fixed "now" used across all tests: 2025-04-01 13:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 13, 0, 0).unwrap()
    }

    fn reading_aged(secs: i64) -> Reading {
        Reading::neutral(fixed_now() - Duration::seconds(secs))
    }

    // --- Not stale ----------------------------------------------------------

    #[test]
    fn test_fresh_reading_is_not_stale() {
        assert!(!is_stale_at(&reading_aged(5), 60, fixed_now()));
    }

    #[test]
    fn test_reading_exactly_at_threshold_is_not_stale() {
        assert!(
            !is_stale_at(&reading_aged(60), 60, fixed_now()),
            "staleness is strictly greater than, not >="
        );
    }

    #[test]
    fn test_future_reading_counts_as_fresh() {
        let reading = reading_aged(-30);
        assert_eq!(age_secs_at(&reading, fixed_now()), 0);
        assert!(!is_stale_at(&reading, 10, fixed_now()));
    }

    #[test]
    fn test_zero_threshold_disables_check() {
        assert!(!is_stale_at(&reading_aged(86_400), 0, fixed_now()));
    }

    // --- Stale --------------------------------------------------------------

    #[test]
    fn test_reading_one_second_past_threshold_is_stale() {
        assert!(is_stale_at(&reading_aged(61), 60, fixed_now()));
    }

    #[test]
    fn test_same_reading_stale_under_tight_threshold_not_under_loose() {
        let reading = reading_aged(30);
        assert!(is_stale_at(&reading, 20, fixed_now()));
        assert!(!is_stale_at(&reading, 60, fixed_now()));
    }
}
