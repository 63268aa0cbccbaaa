//! Domain entities - Objects with identity and lifecycle

mod day_cell;
mod event;
mod holiday;
mod month_data;
pub mod wire;

pub use day_cell::{DayCell, weekday_index};
pub use event::{Event, EventPayload};
pub use holiday::Holiday;
pub use month_data::MonthData;
