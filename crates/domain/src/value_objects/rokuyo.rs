//! Rokuyō (六曜) day-type labels
//!
//! The traditional Japanese six-day cycle printed on calendars. The backend
//! sends the label as a plain string; this type gives it a closed set of
//! variants for renderers that want to style individual labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six rokuyō day types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rokuyo {
    /// 大安 - great luck, auspicious all day
    Taian,
    /// 赤口 - auspicious only around noon
    Shakko,
    /// 先勝 - good luck before noon
    Sensho,
    /// 友引 - avoid funerals
    Tomobiki,
    /// 先負 - good luck after noon
    Senbu,
    /// 仏滅 - the most inauspicious day
    Butsumetsu,
}

impl Rokuyo {
    /// All variants in cycle order
    pub const ALL: [Self; 6] = [
        Self::Taian,
        Self::Shakko,
        Self::Sensho,
        Self::Tomobiki,
        Self::Senbu,
        Self::Butsumetsu,
    ];

    /// The kanji label as printed on calendars
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Taian => "大安",
            Self::Shakko => "赤口",
            Self::Sensho => "先勝",
            Self::Tomobiki => "友引",
            Self::Senbu => "先負",
            Self::Butsumetsu => "仏滅",
        }
    }

    /// Look up a variant from its kanji label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|r| r.label() == label)
    }
}

impl fmt::Display for Rokuyo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
