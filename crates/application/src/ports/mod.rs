//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod calendar_api_port;

#[cfg(test)]
pub use calendar_api_port::MockCalendarApiPort;
pub use calendar_api_port::CalendarApiPort;
