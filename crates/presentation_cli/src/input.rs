//! Parsing of date/time arguments

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use domain::DomainError;

/// A parsed `--start`/`--end` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// A bare date, midnight UTC
    Date(NaiveDate),
    /// A point in time
    Instant(DateTime<Utc>),
}

impl When {
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Self::Instant(instant) => instant,
        }
    }

    pub const fn is_date(self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM` / `YYYY-MM-DD HH:MM` (taken as UTC),
/// or a bare `YYYY-MM-DD`
pub fn parse_when(input: &str) -> Result<When, DomainError> {
    let input = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(When::Instant(instant.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(When::Instant(naive.and_utc()));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(When::Date)
        .map_err(|_| DomainError::InvalidDateTime(input.to_string()))
}
