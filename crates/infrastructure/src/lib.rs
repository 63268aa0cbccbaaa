//! Infrastructure layer - Adapters for external systems
//!
//! Implements the calendar port over the backend HTTP client and owns
//! configuration loading and log subscriber setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::AppConfig;
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
