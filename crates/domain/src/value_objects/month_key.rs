//! Month key value object
//!
//! A normalised `(year, month)` pair identifying one page of the calendar.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Smallest year a [`MonthKey`] can hold
pub const MIN_YEAR: i32 = 1;

/// Largest year a [`MonthKey`] can hold
pub const MAX_YEAR: i32 = 9999;

/// A calendar month, always normalised to a month in 1-12
///
/// Internally the key is the first day of the month, so the invariant
/// cannot be broken once a value exists.
///
/// # Examples
///
/// ```
/// use domain::MonthKey;
///
/// let key = MonthKey::new(2024, 12).unwrap();
/// assert_eq!(key.next(), MonthKey::new(2025, 1).unwrap());
/// assert_eq!(key.to_string(), "2024-12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MonthKeyRepr", into = "MonthKeyRepr")]
pub struct MonthKey {
    first_day: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct MonthKeyRepr {
    year: i32,
    month: u32,
}

impl TryFrom<MonthKeyRepr> for MonthKey {
    type Error = DomainError;

    fn try_from(repr: MonthKeyRepr) -> Result<Self, Self::Error> {
        Self::new(repr.year, repr.month)
    }
}

impl From<MonthKey> for MonthKeyRepr {
    fn from(key: MonthKey) -> Self {
        Self {
            year: key.year(),
            month: key.month(),
        }
    }
}

impl MonthKey {
    /// Create a month key, validating both components
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidMonth`] if `month` is not in 1-12 and
    /// [`DomainError::InvalidYear`] if `year` is outside
    /// [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DomainError::InvalidYear(year));
        }

        let first_day =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(DomainError::InvalidYear(year))?;
        Ok(Self { first_day })
    }

    /// The month containing `date`
    ///
    /// Years outside the supported range are clamped.
    #[must_use]
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        let year = date.year().clamp(MIN_YEAR, MAX_YEAR);
        Self::new(year, date.month()).unwrap_or_else(|_| Self::min())
    }

    fn min() -> Self {
        Self {
            first_day: NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Month number, 1-12
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// The following month; December carries into January of the next year
    ///
    /// Saturates at the last supported month.
    #[must_use]
    pub fn next(self) -> Self {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        Self::new(year, month).unwrap_or(self)
    }

    /// The preceding month; January borrows December of the previous year
    ///
    /// Saturates at the first supported month.
    #[must_use]
    pub fn previous(self) -> Self {
        let (year, month) = if self.month() == 1 {
            (self.year() - 1, 12)
        } else {
            (self.year(), self.month() - 1)
        };
        Self::new(year, month).unwrap_or(self)
    }

    /// First day of the month
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Number of days in the month, accounting for leap years
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if self.is_leap_year() => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Whether the key's year is a Gregorian leap year
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some()
    }

    /// Whether `date` falls inside this month
    #[must_use]
    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Header label shown above the month grid, e.g. `2024年 3月`
    #[must_use]
    pub fn title(&self) -> String {
        format!("{}年 {}月", self.year(), self.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = DomainError;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidDateTime(format!("expected YYYY-MM, got '{s}'"));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}
