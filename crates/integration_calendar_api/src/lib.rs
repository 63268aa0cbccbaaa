//! Calendar backend integration
//!
//! Typed JSON client for the calendar backend: month grids, public holidays,
//! and event CRUD.

pub mod client;

pub use client::{CalendarApiClient, CalendarApiConfig, CalendarApiError, HttpCalendarApiClient};
