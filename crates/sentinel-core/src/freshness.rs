//! Recency classification for timestamped events.
//!
//! An event is "fresh" when its timestamp falls within a bounded window
//! behind `now`. The window differs by consumer: orders use a short window
//! so a restart does not resurrect history, messages use a longer one and
//! are additionally gated by the thread read flag.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Classify a raw RFC 3339 timestamp as fresh or stale.
///
/// Returns true iff `now - t < window`. Events from the future count as
/// fresh. An unparseable timestamp also returns true: dropping a real event
/// silently is worse than notifying twice, so the filter fails open.
#[must_use]
pub fn is_fresh(timestamp: &str, now: DateTime<Utc>, window: Duration) -> bool {
    let parsed = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!(timestamp, error = %e, "Unparseable event timestamp, treating as fresh");
            return true;
        }
    };

    now.signed_duration_since(parsed) < window
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_fresh_within_window() {
        let now = at("2024-05-01T12:00:00Z");
        assert!(is_fresh("2024-05-01T11:59:00Z", now, Duration::minutes(45)));
    }

    #[test]
    fn test_stale_outside_window() {
        let now = at("2024-05-01T12:00:00Z");
        assert!(!is_fresh("2024-05-01T10:00:00Z", now, Duration::minutes(45)));
    }

    #[test]
    fn test_boundary_is_stale() {
        // now - t == window is not strictly inside the window.
        let now = at("2024-05-01T12:45:00Z");
        assert!(!is_fresh("2024-05-01T12:00:00Z", now, Duration::minutes(45)));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let now = at("2024-05-01T12:00:00Z");
        assert!(is_fresh("2024-05-01T12:10:00Z", now, Duration::minutes(45)));
    }

    #[test]
    fn test_unparseable_fails_open() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert!(is_fresh("not-a-timestamp", now, Duration::minutes(45)));
        assert!(is_fresh("", now, Duration::minutes(45)));
    }

    #[test]
    fn test_offset_timestamps_normalize() {
        let now = at("2024-05-01T12:00:00Z");
        // 11:30Z expressed in +02:00.
        assert!(is_fresh(
            "2024-05-01T13:30:00+02:00",
            now,
            Duration::minutes(45)
        ));
    }
}
