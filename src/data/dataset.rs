//! In-memory match table

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::MatchRecord;

/// Loaded match rows, in file order
#[derive(Debug, Clone, Default)]
pub struct MatchDataset {
    pub records: Vec<MatchRecord>,
    /// Names of the retained non-core columns
    pub extra_columns: Vec<String>,
}

impl MatchDataset {
    pub fn new(records: Vec<MatchRecord>, extra_columns: Vec<String>) -> Self {
        MatchDataset {
            records,
            extra_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> DatasetStats {
        let mut seasons = BTreeSet::new();
        let mut divisions = BTreeSet::new();
        let mut teams = BTreeSet::new();

        for record in &self.records {
            seasons.insert(record.season.clone());
            divisions.insert(record.div.clone());
            teams.insert(record.home_team.as_str());
            teams.insert(record.away_team.as_str());
        }

        DatasetStats {
            match_count: self.records.len(),
            team_count: teams.len(),
            seasons: seasons.into_iter().collect(),
            divisions: divisions.into_iter().collect(),
            earliest_match: self.records.iter().map(|r| r.date).min(),
            latest_match: self.records.iter().map(|r| r.date).max(),
        }
    }
}

/// Dataset statistics
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub match_count: usize,
    pub team_count: usize,
    pub seasons: Vec<String>,
    pub divisions: Vec<String>,
    pub earliest_match: Option<NaiveDate>,
    pub latest_match: Option<NaiveDate>,
}
