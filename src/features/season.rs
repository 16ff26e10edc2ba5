//! Season calendar
//!
//! Maps season identifiers to their date windows so that "days since the
//! season started" is a table lookup rather than code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date window of one season, both ends inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Seasons 2021-2022 through 2024-2025, 1 July to 15 June
pub fn default_windows() -> Vec<SeasonWindow> {
    (2021..=2024)
        .filter_map(|year| {
            Some(SeasonWindow {
                id: format!("{}-{}", year, year + 1),
                start: NaiveDate::from_ymd_opt(year, 7, 1)?,
                end: NaiveDate::from_ymd_opt(year + 1, 6, 15)?,
            })
        })
        .collect()
}

/// Lookup table of season windows
#[derive(Debug, Clone, Default)]
pub struct SeasonCalendar {
    windows: Vec<SeasonWindow>,
}

impl SeasonCalendar {
    pub fn new(mut windows: Vec<SeasonWindow>) -> Self {
        windows.sort_by_key(|w| w.start);
        SeasonCalendar { windows }
    }

    /// Window configured for a season identifier
    pub fn window(&self, season: &str) -> Option<&SeasonWindow> {
        self.windows.iter().find(|w| w.id == season)
    }

    /// Window containing the date (the earliest one if windows overlap)
    pub fn window_for(&self, date: NaiveDate) -> Option<&SeasonWindow> {
        self.windows.iter().find(|w| w.contains(date))
    }

    /// Days elapsed since the start of the season containing `date`
    pub fn days_since_start(&self, date: NaiveDate) -> Option<i64> {
        self.window_for(date).map(|w| (date - w.start).num_days())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
