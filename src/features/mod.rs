//! Feature computation
//!
//! History selection, the three aggregators and the engine that runs them
//! over a dataset.

pub mod engine;
pub mod form;
pub mod history;
pub mod points;
pub mod rates;
pub mod season;
pub mod team_stats;

pub use engine::{Column, FeatureEngine, MatchFeatures};
pub use season::{SeasonCalendar, SeasonWindow};
pub use team_stats::TeamStatistics;
