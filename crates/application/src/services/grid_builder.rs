//! Month grid construction
//!
//! Turns a fetched [`MonthData`] into the cells a renderer lays out in a
//! seven-column, Sunday-first table: leading blanks for the weekdays before
//! the 1st, then one cell per day in order. No trailing padding is added.

use domain::{DateNavigator, DayCell, MonthData, MonthKey};

/// Weekday column labels, Sunday first
pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Visual category of a day cell, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCategory {
    Holiday,
    Sunday,
    Saturday,
    Weekday,
}

impl CellCategory {
    /// Category of a weekday column (0 = Sunday)
    #[must_use]
    pub const fn for_weekday_index(index: u32) -> Self {
        match index {
            0 => Self::Sunday,
            6 => Self::Saturday,
            _ => Self::Weekday,
        }
    }

    /// Category of a day; a holiday wins over its weekday
    #[must_use]
    pub fn for_day(cell: &DayCell) -> Self {
        if cell.is_holiday {
            Self::Holiday
        } else {
            Self::for_weekday_index(cell.weekday_index())
        }
    }
}

/// A day cell as placed in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDay {
    pub cell: DayCell,
    pub category: CellCategory,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Placeholder before the 1st of the month
    Blank,
    Day(GridDay),
}

impl GridCell {
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    #[must_use]
    pub const fn as_day(&self) -> Option<&GridDay> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(day),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayHeader {
    pub label: &'static str,
    pub category: CellCategory,
}

/// The laid-out month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    /// Header label, e.g. `2024年 3月`
    pub title: String,
    pub headers: [WeekdayHeader; 7],
    pub cells: Vec<GridCell>,
}

impl CalendarGrid {
    /// True when there were no days to lay out; render a placeholder instead
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_blank()).count()
    }

    /// Day cells only, in order
    pub fn days(&self) -> impl Iterator<Item = &GridDay> {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    /// Rows of seven cells; the last row may be shorter
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    #[must_use]
    pub fn today(&self) -> Option<&GridDay> {
        self.days().find(|d| d.is_today)
    }
}

fn weekday_headers() -> [WeekdayHeader; 7] {
    let mut index = 0;
    WEEKDAY_LABELS.map(|label| {
        let header = WeekdayHeader {
            label,
            category: CellCategory::for_weekday_index(index),
        };
        index += 1;
        header
    })
}

/// Builds grids, checking each day against the navigator's clock
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    navigator: DateNavigator,
}

impl GridBuilder {
    pub const fn new(navigator: DateNavigator) -> Self {
        Self { navigator }
    }

    /// Lay out `data`
    ///
    /// The days are assumed to be contiguous and to start on the 1st;
    /// that is not checked. Today-detection reads the clock on every call.
    #[must_use]
    pub fn build(&self, data: &MonthData) -> CalendarGrid {
        let title = data.key().map_or_else(
            |_| format!("{}年 {}月", data.year, data.month),
            |key| key.title(),
        );

        let leading = data
            .first_day()
            .map_or(0, |first| first.weekday_index() as usize);

        let today = self.navigator.today_date();
        let mut cells = Vec::with_capacity(leading + data.days.len());
        cells.extend(std::iter::repeat_n(GridCell::Blank, leading));
        cells.extend(data.days.iter().map(|cell| {
            GridCell::Day(GridDay {
                category: CellCategory::for_day(cell),
                is_today: DateNavigator::is_same_calendar_day(&cell.date, &today),
                cell: cell.clone(),
            })
        }));

        CalendarGrid {
            title,
            headers: weekday_headers(),
            cells,
        }
    }

    /// A grid with a title but no cells, for a month not loaded yet
    #[must_use]
    pub fn empty(&self, key: MonthKey) -> CalendarGrid {
        CalendarGrid {
            title: key.title(),
            headers: weekday_headers(),
            cells: Vec::new(),
        }
    }
}
