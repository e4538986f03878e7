//! Time utilities: the evaluation date a batch is scored against.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse().map_err(|_| CoreError::InvalidTimezone {
        name: name.to_string(),
    })
}

/// Calendar date of `now` as seen in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_differs_across_zones() {
        // 03:30 UTC on Feb 21 is still Feb 20 in Chicago (UTC-6).
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 3, 30, 0).unwrap();
        let chicago = parse_timezone("America/Chicago").unwrap();
        assert_eq!(today_in(chicago, now), NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert_eq!(today_in(Tz::UTC, now), NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
    }

    #[test]
    fn test_rejects_unknown_zone() {
        let err = parse_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(err.kind(), "invalid_timezone");
    }
}
