//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod calendar_api_adapter;

pub use calendar_api_adapter::CalendarApiAdapter;
