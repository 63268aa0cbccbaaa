//! Calendar API adapter - Implements CalendarApiPort using integration_calendar_api

use application::error::ApplicationError;
use application::ports::CalendarApiPort;
use async_trait::async_trait;
use domain::{Event, EventId, EventPayload, Holiday, MonthData, MonthKey};
use integration_calendar_api::{
    CalendarApiClient, CalendarApiConfig, CalendarApiError, HttpCalendarApiClient,
};
use tracing::{debug, instrument};

/// Adapter for the calendar backend
pub struct CalendarApiAdapter {
    client: HttpCalendarApiClient,
}

impl std::fmt::Debug for CalendarApiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarApiAdapter")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl CalendarApiAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config(CalendarApiConfig::default())
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: CalendarApiConfig) -> Result<Self, ApplicationError> {
        let client = HttpCalendarApiClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Short cause for an error message, without the operation name
    fn reason(err: &CalendarApiError) -> String {
        match err {
            CalendarApiError::RequestFailed { status, .. } => format!("HTTP {status}"),
            CalendarApiError::ConnectionFailed(e) => format!("connection failed: {e}"),
            CalendarApiError::ParseError(e) => format!("invalid response: {e}"),
        }
    }

    fn fetch_error(resource: &'static str) -> impl Fn(CalendarApiError) -> ApplicationError {
        move |err| {
            debug!(resource, error = %err, "Calendar API read failed");
            ApplicationError::fetch_failed(resource, Self::reason(&err))
        }
    }
}

#[async_trait]
impl CalendarApiPort for CalendarApiAdapter {
    #[instrument(skip(self))]
    async fn get_calendar(&self, key: MonthKey) -> Result<MonthData, ApplicationError> {
        self.client
            .get_calendar(key)
            .await
            .map_err(Self::fetch_error("calendar"))
    }

    #[instrument(skip(self))]
    async fn get_holidays(&self, year: i32) -> Result<Vec<Holiday>, ApplicationError> {
        self.client
            .get_holidays(year)
            .await
            .map_err(Self::fetch_error("holidays"))
    }

    #[instrument(skip(self))]
    async fn get_events(&self) -> Result<Vec<Event>, ApplicationError> {
        self.client
            .get_events()
            .await
            .map_err(Self::fetch_error("events"))
    }

    #[instrument(skip(self, payload))]
    async fn create_event(&self, payload: &EventPayload) -> Result<Event, ApplicationError> {
        self.client
            .create_event(payload)
            .await
            .map_err(|e| ApplicationError::EventCreateFailed(Self::reason(&e)))
    }

    #[instrument(skip(self, payload))]
    async fn update_event(
        &self,
        id: EventId,
        payload: &EventPayload,
    ) -> Result<Event, ApplicationError> {
        self.client
            .update_event(id, payload)
            .await
            .map_err(|e| ApplicationError::EventUpdateFailed(Self::reason(&e)))
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, id: EventId) -> Result<(), ApplicationError> {
        self.client
            .delete_event(id)
            .await
            .map_err(|e| ApplicationError::EventDeleteFailed(Self::reason(&e)))
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
