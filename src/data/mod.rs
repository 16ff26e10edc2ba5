//! Data ingestion and output
//!
//! CSV loading of match results and writing of the enriched table.

pub mod dataset;
pub mod export;
pub mod loader;

pub use dataset::{DatasetStats, MatchDataset};
pub use export::OutputFormat;
pub use loader::CsvLoader;
