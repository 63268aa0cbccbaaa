//! Calendar backend port
//!
//! The store's only I/O dependency. Implementations report read failures as
//! [`ApplicationError::FetchFailed`] and mutation failures as the matching
//! `Event*Failed` variant.

use async_trait::async_trait;
use domain::{Event, EventId, EventPayload, Holiday, MonthData, MonthKey};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for calendar backend operations
#[allow(clippy::struct_field_names)] // automock generates struct with `get_*` prefixes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarApiPort: Send + Sync {
    /// Get the day cells of one month
    async fn get_calendar(&self, key: MonthKey) -> Result<MonthData, ApplicationError>;

    /// Get the public holidays of a year
    async fn get_holidays(&self, year: i32) -> Result<Vec<Holiday>, ApplicationError>;

    /// Get every stored event
    async fn get_events(&self) -> Result<Vec<Event>, ApplicationError>;

    /// Create an event and return it as stored
    async fn create_event(&self, payload: &EventPayload) -> Result<Event, ApplicationError>;

    /// Replace an event's editable fields and return it as stored
    async fn update_event(
        &self,
        id: EventId,
        payload: &EventPayload,
    ) -> Result<Event, ApplicationError>;

    /// Delete an event
    async fn delete_event(&self, id: EventId) -> Result<(), ApplicationError>;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;
}
