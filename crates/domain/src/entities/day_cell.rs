//! One day of a fetched month

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    Event,
    wire::{calendar_date, empty_as_none, null_as_empty},
};
use crate::value_objects::Rokuyo;

/// A single day as delivered by `/api/calendar/{year}/{month}`
///
/// The weekday is always derived from `date`; the backend's own weekday
/// string is ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "day")]
    pub day_of_month: u32,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(
        rename = "holiday",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub holiday_name: Option<String>,
    /// Rokuyō label (大安, 仏滅, ...)
    #[serde(rename = "rokuyo", default)]
    pub day_type_label: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
}

impl DayCell {
    /// A plain day with no holiday, label or events
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            is_holiday: false,
            holiday_name: None,
            day_type_label: String::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_holiday(mut self, name: impl Into<String>) -> Self {
        self.is_holiday = true;
        self.holiday_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_day_type(mut self, label: impl Into<String>) -> Self {
        self.day_type_label = label.into();
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    /// 0 = Sunday ... 6 = Saturday
    #[must_use]
    pub fn weekday_index(&self) -> u32 {
        weekday_index(self.date)
    }

    /// The label parsed into a [`Rokuyo`], if it is one of the six known values
    #[must_use]
    pub fn rokuyo(&self) -> Option<Rokuyo> {
        Rokuyo::from_label(&self.day_type_label)
    }

    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Sunday-based weekday index of `date` (0 = Sunday ... 6 = Saturday)
#[must_use]
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}
