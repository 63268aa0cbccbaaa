//! Value Objects - Immutable, identity-less domain primitives

mod event_id;
mod month_key;
mod rokuyo;

pub use event_id::EventId;
pub use month_key::{MAX_YEAR, MIN_YEAR, MonthKey};
pub use rokuyo::Rokuyo;
