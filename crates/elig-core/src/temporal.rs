//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, the UTC-only, seconds-precision instant stamped on
//! audit records.
//!
//! ## Invariant
//!
//! Timestamps are UTC and render as `YYYY-MM-DDTHH:MM:SSZ`: no sub-seconds,
//! no `+00:00`, always `Z`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert!(!ts.to_iso8601().contains('.'));
        assert_eq!(ts.0.nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(987_654_321).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-10-16T09:30:45Z");
        assert_eq!(ts, Timestamp::from_utc(dt));
    }

    #[test]
    fn test_ordering_and_display() {
        let earlier = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap());
        let later = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 1).unwrap());
        assert!(earlier < later);
        assert_eq!(format!("{earlier}"), "2026-10-16T12:00:00Z");
    }

    #[test]
    fn test_serde_round_trip() {
        let ts = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap());
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
    }
}
