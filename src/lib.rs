//! Football match feature engine
//!
//! Season-to-date points, rolling form and home/away rates computed for every
//! match strictly from the matches that came before it.

pub mod data;
pub mod features;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::features::season::SeasonWindow;

pub use data::MatchDataset;
pub use features::{FeatureEngine, MatchFeatures};

/// Full-time result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullTimeResult {
    Home,
    Draw,
    Away,
}

impl FullTimeResult {
    pub fn code(&self) -> &'static str {
        match self {
            FullTimeResult::Home => "H",
            FullTimeResult::Draw => "D",
            FullTimeResult::Away => "A",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "H" => Some(FullTimeResult::Home),
            "D" => Some(FullTimeResult::Draw),
            "A" => Some(FullTimeResult::Away),
            _ => None,
        }
    }

    /// League points earned by the home side
    pub fn home_points(&self) -> u32 {
        match self {
            FullTimeResult::Home => 3,
            FullTimeResult::Draw => 1,
            FullTimeResult::Away => 0,
        }
    }

    /// League points earned by the away side
    pub fn away_points(&self) -> u32 {
        match self {
            FullTimeResult::Home => 0,
            FullTimeResult::Draw => 1,
            FullTimeResult::Away => 3,
        }
    }
}

impl fmt::Display for FullTimeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Side a team played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Home,
    Away,
}

/// Outcome counted by the rate features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
}

/// A single match row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub season: String,
    pub div: String,
    pub home_team: String,
    pub away_team: String,
    pub result: FullTimeResult,
    /// Retained non-core columns, aligned with `MatchDataset::extra_columns`
    pub extra: Vec<String>,
}

impl MatchRecord {
    pub fn home_points(&self) -> u32 {
        self.result.home_points()
    }

    pub fn away_points(&self) -> u32 {
        self.result.away_points()
    }

    /// Check if the given team played in this match
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Role the team played, or None if it did not take part
    pub fn role_of(&self, team: &str) -> Option<Role> {
        if self.home_team == team {
            Some(Role::Home)
        } else if self.away_team == team {
            Some(Role::Away)
        } else {
            None
        }
    }

    /// Team playing the given role
    pub fn team(&self, role: Role) -> &str {
        match role {
            Role::Home => &self.home_team,
            Role::Away => &self.away_team,
        }
    }

    /// Points earned by a team in this match (0 if it did not play)
    pub fn points_for(&self, team: &str) -> u32 {
        match self.role_of(team) {
            Some(Role::Home) => self.home_points(),
            Some(Role::Away) => self.away_points(),
            None => 0,
        }
    }

    /// Same season and division
    pub fn same_partition(&self, season: &str, div: &str) -> bool {
        self.season == season && self.div == div
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum FootyError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Line {line}: cannot parse date '{value}' with format '{format}'")]
    InvalidDate {
        line: usize,
        value: String,
        format: String,
    },

    #[error("Line {line}: unknown full-time result '{value}' (expected H, D or A)")]
    UnknownResult { line: usize, value: String },

    #[error("Line {line}: empty value in column {column}")]
    EmptyField { line: usize, column: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FootyError>;

/// Which same-day matches count towards cumulative points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutoffPolicy {
    /// Only matches on earlier dates
    #[default]
    Strict,
    /// Also matches on the same date, the current one included (legacy output)
    Inclusive,
}

/// How the engine walks the history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One pass in date order with running totals
    #[default]
    Incremental,
    /// Re-select the history for every row
    Scan,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incremental" => Ok(Strategy::Incremental),
            "scan" => Ok(Strategy::Scan),
            _ => Err(format!("Unknown strategy: {}. Use incremental or scan.", s)),
        }
    }
}

/// Application configuration loaded from footy.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub features: FeatureConfig,
    pub data: DataConfig,
    #[serde(default = "features::season::default_windows")]
    pub seasons: Vec<SeasonWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Matches averaged by rolling form
    pub window_size: usize,
    /// Matches needed before rolling form is defined
    pub min_required: usize,
    pub cumulative_cutoff: CutoffPolicy,
    pub strategy: Strategy,
    pub form: bool,
    pub rates: bool,
    pub days_since_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// chrono format of the Date column
    pub date_format: String,
    /// Extra input columns copied to the output
    pub keep: Vec<String>,
    /// Written in place of undefined values in CSV output
    pub missing_marker: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            window_size: 5,
            min_required: 5,
            cumulative_cutoff: CutoffPolicy::Strict,
            strategy: Strategy::Incremental,
            form: true,
            rates: true,
            days_since_start: false,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(FootyError::Config(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.min_required < self.window_size {
            return Err(FootyError::Config(format!(
                "min_required ({}) must not be smaller than window_size ({})",
                self.min_required, self.window_size
            )));
        }
        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            date_format: "%d/%m/%Y".to_string(),
            keep: Vec::new(),
            missing_marker: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            features: FeatureConfig::default(),
            data: DataConfig::default(),
            seasons: features::season::default_windows(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FootyError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| FootyError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FootyError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.features.validate()?;
        for window in &self.seasons {
            if window.end < window.start {
                return Err(FootyError::Config(format!(
                    "season {} ends ({}) before it starts ({})",
                    window.id, window.end, window.start
                )));
            }
        }
        Ok(())
    }
}
