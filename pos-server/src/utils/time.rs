//! Time helpers — business timezone conversion
//!
//! The engine works with `i64` Unix millis everywhere; date strings appear
//! only as business-date keys (`YYYY-MM-DD`).

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a cutoff time string (HH:MM); falls back to 00:00
pub fn parse_cutoff(cutoff: &str) -> NaiveTime {
    NaiveTime::parse_from_str(cutoff, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse business_day_cutoff '{}': {}, falling back to 00:00",
            cutoff,
            e
        );
        NaiveTime::MIN
    })
}

/// Parse an IANA timezone name; falls back to UTC
pub fn parse_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to UTC", name);
        chrono_tz::UTC
    })
}

/// Business date for a given instant
///
/// Local time before the cutoff still belongs to the previous business day.
pub fn business_date_at(millis: i64, cutoff: NaiveTime, tz: Tz) -> NaiveDate {
    let local = match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&tz),
        _ => Utc::now().with_timezone(&tz),
    };
    if local.time() < cutoff {
        (local - chrono::Duration::days(1)).date_naive()
    } else {
        local.date_naive()
    }
}
