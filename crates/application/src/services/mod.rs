//! Application services - Use case implementations

mod calendar_store;
mod grid_builder;

pub use calendar_store::{CalendarStore, CalendarStoreBuilder, CalendarViewState, FetchOutcome};
pub use grid_builder::{
    CalendarGrid, CellCategory, GridBuilder, GridCell, GridDay, WEEKDAY_LABELS, WeekdayHeader,
};
