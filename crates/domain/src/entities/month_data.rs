//! A fetched month of calendar data

use serde::{Deserialize, Serialize};

use super::{DayCell, wire::null_as_empty};
use crate::{errors::DomainError, value_objects::MonthKey};

/// Response body of `/api/calendar/{year}/{month}`
///
/// `days` covers exactly the days of the month in order. The value is
/// replaced wholesale on every fetch, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthData {
    pub year: i32,
    pub month: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub days: Vec<DayCell>,
}

impl MonthData {
    #[must_use]
    pub const fn new(year: i32, month: u32, days: Vec<DayCell>) -> Self {
        Self { year, month, days }
    }

    /// Plain days (no holidays, labels or events) for a whole month
    #[must_use]
    pub fn blank(key: MonthKey) -> Self {
        let days = key
            .first_day()
            .iter_days()
            .take_while(|d| key.contains(d))
            .map(DayCell::new)
            .collect();
        Self::new(key.year(), key.month(), days)
    }

    /// The month this payload describes
    ///
    /// # Errors
    ///
    /// Returns an error if the backend sent an out-of-range year or month.
    pub fn key(&self) -> Result<MonthKey, DomainError> {
        MonthKey::new(self.year, self.month)
    }

    #[must_use]
    pub fn first_day(&self) -> Option<&DayCell> {
        self.days.first()
    }
}
