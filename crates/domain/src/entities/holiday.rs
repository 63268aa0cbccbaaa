//! Public holiday entry

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::calendar_date;

/// A named public holiday
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}
