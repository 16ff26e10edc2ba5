//! CSV loading
//!
//! Reads a results file (football-data.co.uk layout), checks the core schema
//! and keeps the extra columns the caller asked for.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::dataset::MatchDataset;
use crate::{DataConfig, FootyError, FullTimeResult, MatchRecord, Result};

pub const DATE: &str = "Date";
pub const SEASON: &str = "Season";
pub const DIV: &str = "Div";
pub const HOME_TEAM: &str = "HomeTeam";
pub const AWAY_TEAM: &str = "AwayTeam";
pub const FTR: &str = "FTR";

/// Columns every input file must carry, in output order
pub const CORE_COLUMNS: [&str; 6] = [DATE, SEASON, DIV, HOME_TEAM, AWAY_TEAM, FTR];

/// Column positions of the core fields
struct Layout {
    date: usize,
    season: usize,
    div: usize,
    home_team: usize,
    away_team: usize,
    ftr: usize,
    extra: Vec<usize>,
}

/// Loads match CSV files
#[derive(Debug, Clone)]
pub struct CsvLoader {
    date_format: String,
    keep: Vec<String>,
}

impl Default for CsvLoader {
    fn default() -> Self {
        CsvLoader {
            date_format: DataConfig::default().date_format,
            keep: Vec::new(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for the `[data]` section, repeated columns kept once
    pub fn from_config(config: &DataConfig) -> Self {
        Self::new()
            .with_date_format(&config.date_format)
            .keep(config.keep.iter().cloned())
    }

    /// Set the chrono format of the Date column
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    /// Add columns copied through to the output
    pub fn keep<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if !self.keep.contains(&column) {
                self.keep.push(column);
            }
        }
        self
    }

    /// Load a CSV file from disk
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<MatchDataset> {
        let path = path.as_ref();
        log::info!("Loading matches from {}", path.display());
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Load CSV data from any reader
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<MatchDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let (layout, extra_columns) = self.resolve_layout(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let row = result?;

            if row.iter().all(|field| field.is_empty()) {
                log::debug!("Skipping blank line {}", line);
                continue;
            }

            records.push(self.parse_row(&row, &layout, line)?);
        }

        log::info!(
            "Loaded {} matches ({} extra columns kept)",
            records.len(),
            extra_columns.len()
        );
        Ok(MatchDataset::new(records, extra_columns))
    }

    fn resolve_layout(&self, headers: &csv::StringRecord) -> Result<(Layout, Vec<String>)> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        let position = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| FootyError::MissingColumn(name.to_string()))
        };

        let mut extra = Vec::new();
        let mut extra_columns = Vec::new();
        for name in &self.keep {
            if CORE_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            extra.push(position(name.as_str())?);
            extra_columns.push(name.clone());
        }

        let layout = Layout {
            date: position(DATE)?,
            season: position(SEASON)?,
            div: position(DIV)?,
            home_team: position(HOME_TEAM)?,
            away_team: position(AWAY_TEAM)?,
            ftr: position(FTR)?,
            extra,
        };
        Ok((layout, extra_columns))
    }

    fn parse_row(&self, row: &csv::StringRecord, layout: &Layout, line: usize) -> Result<MatchRecord> {
        let field = |idx: usize, column: &str| -> Result<String> {
            match row.get(idx) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(FootyError::EmptyField {
                    line,
                    column: column.to_string(),
                }),
            }
        };

        let raw_date = field(layout.date, DATE)?;
        let date = NaiveDate::parse_from_str(&raw_date, &self.date_format).map_err(|_| {
            FootyError::InvalidDate {
                line,
                value: raw_date.clone(),
                format: self.date_format.clone(),
            }
        })?;

        let raw_result = field(layout.ftr, FTR)?;
        let result =
            FullTimeResult::from_code(&raw_result).ok_or_else(|| FootyError::UnknownResult {
                line,
                value: raw_result.clone(),
            })?;

        Ok(MatchRecord {
            date,
            season: field(layout.season, SEASON)?,
            div: field(layout.div, DIV)?,
            home_team: field(layout.home_team, HOME_TEAM)?,
            away_team: field(layout.away_team, AWAY_TEAM)?,
            result,
            extra: layout
                .extra
                .iter()
                .map(|&i| row.get(i).unwrap_or_default().to_string())
                .collect(),
        })
    }
}
