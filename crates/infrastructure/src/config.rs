//! Application configuration
//!
//! Layered: built-in defaults, then an optional `calendar.toml`, then
//! `CALENDAR_*` environment variables (nested keys use `__`, e.g.
//! `CALENDAR_API__TIMEOUT_SECS`). `CALENDAR_API_URL` overrides the backend
//! base URL last.

use std::path::Path;

use integration_calendar_api::CalendarApiConfig;
use serde::{Deserialize, Serialize};

use crate::telemetry::LoggingConfig;

/// Environment variable that overrides `api.base_url`
pub const API_URL_ENV: &str = "CALENDAR_API_URL";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Calendar backend connection
    #[serde(default)]
    pub api: CalendarApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `calendar.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `file` instead of `calendar.toml`
    ///
    /// An explicitly given file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be parsed.
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let file_source = file.map_or_else(
            || config::File::with_name("calendar").required(false),
            |path| config::File::from(path).required(true),
        );

        let builder = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("logging.format", defaults.logging.format.to_string())?
            .set_default("logging.filter", defaults.logging.filter)?
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("CALENDAR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var(API_URL_ENV).ok())?;

        builder.build()?.try_deserialize()
    }
}
