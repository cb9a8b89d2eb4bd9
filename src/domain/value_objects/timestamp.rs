//! # Timestamp
//!
//! UTC instant measured by the aggregator itself: token expiry and the moment
//! a search completed. Flight schedule times stay provider-local
//! (`chrono::NaiveDateTime` on segments) and never pass through here.
//!
//! ```
//! use flight_aggregator::domain::value_objects::timestamp::Timestamp;
//!
//! let issued = Timestamp::now();
//! let expiry = issued.add_secs(3600);
//! assert!(!expiry.has_passed_at(&issued));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instant in UTC, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current instant from the system clock.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Builds a timestamp from whole Unix seconds.
    ///
    /// Returns `None` when `secs` falls outside chrono's representable range.
    ///
    /// ```
    /// use flight_aggregator::domain::value_objects::timestamp::Timestamp;
    ///
    /// assert_eq!(Timestamp::from_secs(86_400).unwrap().unix_secs(), 86_400);
    /// assert!(Timestamp::from_secs(i64::MAX).is_none());
    /// ```
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Whole seconds since the Unix epoch.
    #[must_use]
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Shifts by `secs`; negative values move backwards. Saturates instead
    /// of overflowing for absurd `expires_in` values.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        let bound = if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        Self(
            Duration::try_seconds(secs)
                .and_then(|delta| self.0.checked_add_signed(delta))
                .unwrap_or(bound),
        )
    }

    /// An instant equal to `now` already counts as passed, so a zero-second
    /// lifetime is never served from cache.
    #[inline]
    #[must_use]
    pub fn has_passed_at(&self, now: &Self) -> bool {
        self.0 <= now.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shifting_forward_and_back() {
        let base = Timestamp::from_secs(1_700_000_000).unwrap();
        assert_eq!(base.add_secs(90).unix_secs(), 1_700_000_090);
        assert_eq!(base.add_secs(-90).unix_secs(), 1_699_999_910);
    }

    #[test]
    fn expiry_boundary_counts_as_passed() {
        let issued = Timestamp::from_secs(500).unwrap();
        assert!(issued.add_secs(0).has_passed_at(&issued));
        assert!(issued.has_passed_at(&issued.add_secs(1)));
        assert!(!issued.add_secs(1).has_passed_at(&issued));
    }

    #[test]
    fn huge_lifetime_saturates() {
        let far = Timestamp::now().add_secs(i64::MAX);
        assert!(!far.has_passed_at(&Timestamp::now()));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::from_secs(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00+00:00");
    }
}
