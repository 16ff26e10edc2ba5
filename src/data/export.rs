//! Writing enriched rows
//!
//! Core columns first, then retained extras, then the feature columns, one
//! row per input match in input order.

use serde_json::{Map, Value};
use std::io::Write;

use super::dataset::MatchDataset;
use super::loader::CORE_COLUMNS;
use crate::features::{Column, MatchFeatures};
use crate::{MatchRecord, Result};

/// Dates are written back in ISO form
const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv or json.", s)),
        }
    }
}

fn core_values(record: &MatchRecord) -> [String; 6] {
    [
        record.date.format(OUTPUT_DATE_FORMAT).to_string(),
        record.season.clone(),
        record.div.clone(),
        record.home_team.clone(),
        record.away_team.clone(),
        record.result.code().to_string(),
    ]
}

/// Write rows as CSV, `missing` filling undefined cells
pub fn write_csv<W: Write>(
    writer: W,
    dataset: &MatchDataset,
    features: &[MatchFeatures],
    columns: &[Column],
    missing: &str,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header: Vec<&str> = CORE_COLUMNS
        .iter()
        .copied()
        .chain(dataset.extra_columns.iter().map(String::as_str))
        .chain(columns.iter().map(|c| c.name()))
        .collect();
    csv_writer.write_record(&header)?;

    for (record, row) in dataset.records.iter().zip(features) {
        let cells: Vec<String> = core_values(record)
            .into_iter()
            .chain(record.extra.iter().cloned())
            .chain(columns.iter().map(|c| c.format(row, missing)))
            .collect();
        csv_writer.write_record(&cells)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write rows as a JSON array of objects, undefined cells as null
pub fn write_json<W: Write>(
    mut writer: W,
    dataset: &MatchDataset,
    features: &[MatchFeatures],
    columns: &[Column],
) -> Result<()> {
    let rows: Vec<Value> = dataset
        .records
        .iter()
        .zip(features)
        .map(|(record, row)| {
            let mut object = Map::new();
            for (name, value) in CORE_COLUMNS.iter().zip(core_values(record)) {
                object.insert(name.to_string(), Value::String(value));
            }
            for (name, value) in dataset.extra_columns.iter().zip(&record.extra) {
                object.insert(name.clone(), Value::String(value.clone()));
            }
            for column in columns {
                object.insert(column.name().to_string(), column.to_json(row));
            }
            Value::Object(object)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FullTimeResult;
    use chrono::NaiveDate;

    fn sample() -> (MatchDataset, Vec<MatchFeatures>) {
        let record = MatchRecord {
            date: NaiveDate::from_ymd_opt(2021, 8, 14).unwrap(),
            season: "2021-2022".to_string(),
            div: "E0".to_string(),
            home_team: "Brentford".to_string(),
            away_team: "Arsenal".to_string(),
            result: FullTimeResult::Home,
            extra: vec!["2".to_string()],
        };
        let features = MatchFeatures {
            home_points: 3,
            away_points: 0,
            home_win_rate: Some(0.5),
            ..Default::default()
        };
        (
            MatchDataset::new(vec![record], vec!["FTHG".to_string()]),
            vec![features],
        )
    }

    #[test]
    fn test_csv_output() {
        let (dataset, features) = sample();
        let columns = [Column::HomePoints, Column::HomeGained, Column::HomeForm, Column::HomeWinRate];

        let mut out = Vec::new();
        write_csv(&mut out, &dataset, &features, &columns, "").unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Season,Div,HomeTeam,AwayTeam,FTR,FTHG,HomePoints,HP_GAINED,HOME_FORM,HWR")
        );
        // Missing form stays empty, zero points stay zero
        assert_eq!(
            lines.next(),
            Some("2021-08-14,2021-2022,E0,Brentford,Arsenal,H,2,3,0,,0.5")
        );
    }

    #[test]
    fn test_csv_missing_marker() {
        let (dataset, features) = sample();
        let mut out = Vec::new();
        write_csv(&mut out, &dataset, &features, &[Column::AwayForm], "NA").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",NA"));
    }

    #[test]
    fn test_json_output() {
        let (dataset, features) = sample();
        let columns = [Column::AwayPoints, Column::AwayForm, Column::HomeWinRate];

        let mut out = Vec::new();
        write_json(&mut out, &dataset, &features, &columns).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();

        let row = &value[0];
        assert_eq!(row["HomeTeam"], "Brentford");
        assert_eq!(row["FTHG"], "2");
        assert_eq!(row["AwayPoints"], 0);
        assert_eq!(row["AWAY_FORM"], Value::Null);
        assert_eq!(row["HWR"], 0.5);
    }

    #[test]
    fn test_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
