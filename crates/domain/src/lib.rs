//! Domain layer for the calendar client
//!
//! Contains the month/day/event model, month navigation, and domain errors.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod navigation;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use navigation::{Clock, DateNavigator, FixedClock, SystemClock};
pub use value_objects::*;
