//! Serde helpers for the calendar backend's JSON shapes

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Calendar dates as sent by the backend
///
/// Accepts a bare `YYYY-MM-DD` or any timestamp that starts with one
/// (the backend emits midnight-UTC RFC 3339 values). Only the date part
/// is kept. Serialises as `YYYY-MM-DD`.
pub mod calendar_date {
    use super::*;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid calendar date: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        let (date_part, rest) = (raw.get(..10)?, raw.get(10..)?);
        if !(rest.is_empty() || rest.starts_with(['T', ' '])) {
            return None;
        }
        NaiveDate::parse_from_str(date_part, FORMAT).ok()
    }
}

/// The backend sends `null` instead of an empty list
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat `""` the same as a missing value
pub fn empty_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
