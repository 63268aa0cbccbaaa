//! Calendar backend client
//!
//! HTTP client for the calendar backend's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Event, EventId, EventPayload, Holiday, MonthData, MonthKey};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

/// Calendar API client errors
#[derive(Debug, Error)]
pub enum CalendarApiError {
    /// The HTTP client could not be built or the server could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-2xx status
    #[error("{operation} failed: HTTP {status}")]
    RequestFailed {
        operation: &'static str,
        status: u16,
    },

    /// The response body was not the expected JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Calendar API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarApiConfig {
    /// Backend base URL (default: <http://localhost:8080>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for CalendarApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Calendar backend operations
#[async_trait]
pub trait CalendarApiClient: Send + Sync {
    /// `GET /api/calendar/{year}/{month}`
    async fn get_calendar(&self, key: MonthKey) -> Result<MonthData, CalendarApiError>;

    /// `GET /api/holidays/{year}`
    async fn get_holidays(&self, year: i32) -> Result<Vec<Holiday>, CalendarApiError>;

    /// `GET /api/events`
    async fn get_events(&self) -> Result<Vec<Event>, CalendarApiError>;

    /// `POST /api/events`
    async fn create_event(&self, payload: &EventPayload) -> Result<Event, CalendarApiError>;

    /// `PUT /api/events/{id}`
    async fn update_event(
        &self,
        id: EventId,
        payload: &EventPayload,
    ) -> Result<Event, CalendarApiError>;

    /// `DELETE /api/events/{id}`
    async fn delete_event(&self, id: EventId) -> Result<(), CalendarApiError>;

    /// Check if the backend answers its health endpoint
    async fn is_healthy(&self) -> bool;
}

/// reqwest-backed implementation
#[derive(Debug)]
pub struct HttpCalendarApiClient {
    client: Client,
    base_url: String,
}

impl HttpCalendarApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: CalendarApiConfig) -> Result<Self, CalendarApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CalendarApiError::ConnectionFailed(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, CalendarApiError> {
        Self::new(CalendarApiConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return the response if its status is 2xx
    async fn send(
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, CalendarApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| CalendarApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, operation, "Calendar API returned an error status");
            return Err(CalendarApiError::RequestFailed {
                operation,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, CalendarApiError> {
        Self::send(request, operation)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CalendarApiError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl CalendarApiClient for HttpCalendarApiClient {
    #[instrument(skip(self), fields(month = %key))]
    async fn get_calendar(&self, key: MonthKey) -> Result<MonthData, CalendarApiError> {
        let url = self.url(&format!("/api/calendar/{}/{}", key.year(), key.month()));
        debug!(url = %url, "Fetching calendar month");

        Self::send_json(self.client.get(&url), "Fetch calendar").await
    }

    #[instrument(skip(self))]
    async fn get_holidays(&self, year: i32) -> Result<Vec<Holiday>, CalendarApiError> {
        let url = self.url(&format!("/api/holidays/{year}"));
        debug!(url = %url, "Fetching holidays");

        let holidays: Option<Vec<Holiday>> =
            Self::send_json(self.client.get(&url), "Fetch holidays").await?;
        Ok(holidays.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_events(&self) -> Result<Vec<Event>, CalendarApiError> {
        let url = self.url("/api/events");
        debug!(url = %url, "Fetching events");

        let events: Option<Vec<Event>> =
            Self::send_json(self.client.get(&url), "Fetch events").await?;
        Ok(events.unwrap_or_default())
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    async fn create_event(&self, payload: &EventPayload) -> Result<Event, CalendarApiError> {
        let url = self.url("/api/events");
        debug!(url = %url, "Creating event");

        Self::send_json(self.client.post(&url).json(payload), "Create event").await
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    async fn update_event(
        &self,
        id: EventId,
        payload: &EventPayload,
    ) -> Result<Event, CalendarApiError> {
        let url = self.url(&format!("/api/events/{id}"));
        debug!(url = %url, "Updating event");

        Self::send_json(self.client.put(&url).json(payload), "Update event").await
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, id: EventId) -> Result<(), CalendarApiError> {
        let url = self.url(&format!("/api/events/{id}"));
        debug!(url = %url, "Deleting event");

        Self::send(self.client.delete(&url), "Delete event").await?;
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        Self::send(self.client.get(self.url("/health")), "Health check")
            .await
            .is_ok()
    }
}
