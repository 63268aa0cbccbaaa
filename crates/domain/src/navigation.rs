//! Month navigation and wall-clock access
//!
//! [`DateNavigator`] is the only place that reads the current date, and it
//! does so through a [`Clock`] so that "today" can be pinned in tests.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicI32, Ordering},
    },
};

use chrono::{Datelike, Local, NaiveDate};

use crate::value_objects::MonthKey;

/// Source of the current calendar date
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// The local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a date that can be moved explicitly
#[derive(Debug)]
pub struct FixedClock {
    days_from_ce: AtomicI32,
}

impl FixedClock {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            days_from_ce: AtomicI32::new(date.num_days_from_ce()),
        }
    }

    /// Move the clock to `date`
    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}

/// Month arithmetic and today-detection
#[derive(Debug, Clone)]
pub struct DateNavigator {
    clock: Arc<dyn Clock>,
}

impl Default for DateNavigator {
    fn default() -> Self {
        Self::system()
    }
}

impl DateNavigator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Navigator backed by the local wall clock
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// December rolls over into January of the following year
    #[must_use]
    pub fn next_month(key: MonthKey) -> MonthKey {
        key.next()
    }

    /// January rolls back into December of the preceding year
    #[must_use]
    pub fn previous_month(key: MonthKey) -> MonthKey {
        key.previous()
    }

    /// Year and month of the wall clock at call time
    #[must_use]
    pub fn today(&self) -> MonthKey {
        MonthKey::from_date(&self.clock.today())
    }

    #[must_use]
    pub fn today_date(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Compares year, month and day-of-month; time of day is ignored
    #[must_use]
    pub fn is_same_calendar_day<A: Datelike, B: Datelike>(date: &A, reference: &B) -> bool {
        date.year() == reference.year()
            && date.month() == reference.month()
            && date.day() == reference.day()
    }

    /// Whether `date` is the wall-clock date right now
    #[must_use]
    pub fn is_today<D: Datelike>(&self, date: &D) -> bool {
        Self::is_same_calendar_day(date, &self.clock.today())
    }
}
