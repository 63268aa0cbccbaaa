//! Event entity - user-created calendar entries owned by the backend

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{errors::DomainError, value_objects::EventId};

/// A calendar event as stored by the backend
///
/// The client only holds a read-through copy; every mutation goes through
/// the API and the list is refetched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The editable part of the event, e.g. to prefill an update
    #[must_use]
    pub fn to_payload(&self) -> EventPayload {
        EventPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            all_day: self.all_day,
        }
    }
}

/// Body of create and update requests
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use domain::EventPayload;
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
/// let payload = EventPayload::new("Standup", start, end)
///     .unwrap()
///     .with_description("Daily sync");
/// assert_eq!(payload.description, "Daily sync");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EventPayload {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

impl EventPayload {
    /// Create a timed event payload
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the event ends before it
    /// starts.
    pub fn new(
        title: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let candidate = Self {
            title: title.into().trim().to_string(),
            description: String::new(),
            start_date,
            end_date,
            all_day: false,
        };
        candidate.ensure_valid()?;
        Ok(candidate)
    }

    /// Create an all-day payload covering `first..=last`
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or `last` precedes `first`.
    pub fn all_day(
        title: impl Into<String>,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Self, DomainError> {
        let mut payload = Self::new(
            title,
            first.and_time(chrono::NaiveTime::MIN).and_utc(),
            last.and_time(chrono::NaiveTime::MIN).and_utc(),
        )?;
        payload.all_day = true;
        Ok(payload)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the same rules the backend enforces
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] describing the first
    /// violated rule.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::ValidationError("title is required".into()));
        }
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        if self.end_date < self.start_date {
            return Err(DomainError::ValidationError(
                "end_date must not precede start_date".into(),
            ));
        }
        Ok(())
    }
}
