//! Application layer - Use cases and orchestration
//!
//! Holds the calendar state store, the month grid builder, and the port the
//! store uses to reach the calendar backend. Adapters in the infrastructure
//! layer implement the port.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
