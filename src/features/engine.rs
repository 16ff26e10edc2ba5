//! Feature engine
//!
//! Runs the points, form and rate aggregators over a whole dataset and
//! produces one row of features per match, in input order.

use serde_json::{json, Value};

use super::form::{rolling_form, RollingForm};
use super::history::select;
use super::points::cumulative_points;
use super::rates::{rate, round_to, RATE_DECIMALS};
use super::season::{default_windows, SeasonCalendar};
use super::team_stats::TeamStatisticsComputer;
use crate::data::MatchDataset;
use crate::{Config, CutoffPolicy, FeatureConfig, MatchRecord, Outcome, Result, Role, Strategy};

/// Derived values for one match. Undefined values are None.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFeatures {
    pub home_points: u32,
    pub away_points: u32,
    /// Season-to-date points of the home team
    pub home_gained: u32,
    /// Season-to-date points of the away team
    pub away_gained: u32,
    pub home_form: Option<f64>,
    pub away_form: Option<f64>,
    /// Home team's win rate at home
    pub home_win_rate: Option<f64>,
    /// Home team's draw rate at home
    pub home_draw_rate: Option<f64>,
    /// Away team's win rate away
    pub away_win_rate: Option<f64>,
    /// Away team's draw rate away
    pub away_draw_rate: Option<f64>,
    pub days_since_start: Option<i64>,
}

/// Output column produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    HomePoints,
    AwayPoints,
    HomeGained,
    AwayGained,
    HomeForm,
    AwayForm,
    HomeWinRate,
    HomeDrawRate,
    AwayWinRate,
    AwayDrawRate,
    DaysSinceStart,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::HomePoints => "HomePoints",
            Column::AwayPoints => "AwayPoints",
            Column::HomeGained => "HP_GAINED",
            Column::AwayGained => "AP_GAINED",
            Column::HomeForm => "HOME_FORM",
            Column::AwayForm => "AWAY_FORM",
            Column::HomeWinRate => "HWR",
            Column::HomeDrawRate => "HDR",
            Column::AwayWinRate => "AWR",
            Column::AwayDrawRate => "ADR",
            Column::DaysSinceStart => "DAYS_SINCE_START",
        }
    }

    /// Text cell, with `missing` standing in for undefined values
    pub fn format(&self, features: &MatchFeatures, missing: &str) -> String {
        let float = |v: Option<f64>| v.map_or_else(|| missing.to_string(), |x| x.to_string());
        match self {
            Column::HomePoints => features.home_points.to_string(),
            Column::AwayPoints => features.away_points.to_string(),
            Column::HomeGained => features.home_gained.to_string(),
            Column::AwayGained => features.away_gained.to_string(),
            Column::HomeForm => float(features.home_form),
            Column::AwayForm => float(features.away_form),
            Column::HomeWinRate => float(features.home_win_rate),
            Column::HomeDrawRate => float(features.home_draw_rate),
            Column::AwayWinRate => float(features.away_win_rate),
            Column::AwayDrawRate => float(features.away_draw_rate),
            Column::DaysSinceStart => features
                .days_since_start
                .map_or_else(|| missing.to_string(), |d| d.to_string()),
        }
    }

    /// JSON cell, null for undefined values
    pub fn to_json(&self, features: &MatchFeatures) -> Value {
        match self {
            Column::HomePoints => json!(features.home_points),
            Column::AwayPoints => json!(features.away_points),
            Column::HomeGained => json!(features.home_gained),
            Column::AwayGained => json!(features.away_gained),
            Column::HomeForm => json!(features.home_form),
            Column::AwayForm => json!(features.away_form),
            Column::HomeWinRate => json!(features.home_win_rate),
            Column::HomeDrawRate => json!(features.home_draw_rate),
            Column::AwayWinRate => json!(features.away_win_rate),
            Column::AwayDrawRate => json!(features.away_draw_rate),
            Column::DaysSinceStart => json!(features.days_since_start),
        }
    }
}

/// Computes features for every match of a dataset
pub struct FeatureEngine {
    config: FeatureConfig,
    calendar: SeasonCalendar,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        FeatureEngine {
            config,
            calendar: SeasonCalendar::new(default_windows()),
        }
    }

    /// Engine for a validated application config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(FeatureEngine {
            config: config.features.clone(),
            calendar: SeasonCalendar::new(config.seasons.clone()),
        })
    }

    /// Columns appended to each row, in output order
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![
            Column::HomePoints,
            Column::AwayPoints,
            Column::HomeGained,
            Column::AwayGained,
        ];
        if self.config.form {
            columns.extend([Column::HomeForm, Column::AwayForm]);
        }
        if self.config.rates {
            columns.extend([
                Column::HomeWinRate,
                Column::HomeDrawRate,
                Column::AwayWinRate,
                Column::AwayDrawRate,
            ]);
        }
        if self.config.days_since_start {
            columns.push(Column::DaysSinceStart);
        }
        columns
    }

    /// Features for every match, in input order
    pub fn compute(&self, dataset: &MatchDataset) -> Vec<MatchFeatures> {
        log::info!(
            "Computing features for {} matches ({:?} strategy, {:?} cutoff)",
            dataset.len(),
            self.config.strategy,
            self.config.cumulative_cutoff
        );

        match self.config.strategy {
            Strategy::Incremental => self.compute_incremental(&dataset.records),
            Strategy::Scan => self.compute_scan(&dataset.records),
        }
    }

    /// Re-select each match's history from the full table
    pub fn compute_scan(&self, matches: &[MatchRecord]) -> Vec<MatchFeatures> {
        let inclusive = self.config.cumulative_cutoff == CutoffPolicy::Inclusive;

        matches
            .iter()
            .map(|record| {
                let gained = |team: &str| {
                    let history =
                        select(matches, team, record.date, &record.season, &record.div, inclusive);
                    cumulative_points(team, history)
                };

                let mut features = MatchFeatures {
                    home_points: record.home_points(),
                    away_points: record.away_points(),
                    home_gained: gained(&record.home_team),
                    away_gained: gained(&record.away_team),
                    ..Default::default()
                };

                if self.config.form {
                    let form = |team: &str| {
                        rolling_form(
                            team,
                            record.date,
                            matches,
                            self.config.window_size,
                            self.config.min_required,
                        )
                    };
                    features.home_form = form(&record.home_team);
                    features.away_form = form(&record.away_team);
                }

                if self.config.rates {
                    let role_rate = |role: Role, outcome: Outcome| {
                        rate(
                            matches,
                            record.team(role),
                            record.date,
                            &record.season,
                            &record.div,
                            role,
                            outcome,
                        )
                    };
                    features.home_win_rate = role_rate(Role::Home, Outcome::Win);
                    features.home_draw_rate = role_rate(Role::Home, Outcome::Draw);
                    features.away_win_rate = role_rate(Role::Away, Outcome::Win);
                    features.away_draw_rate = role_rate(Role::Away, Outcome::Draw);
                }

                if self.config.days_since_start {
                    features.days_since_start = self.calendar.days_since_start(record.date);
                }

                features
            })
            .collect()
    }

    /// Single pass in date order with running totals.
    ///
    /// All matches on one date are featurized before any of them is added to
    /// the totals, so nothing sees a match from its own day unless the
    /// inclusive cutoff asks for it.
    pub fn compute_incremental(&self, matches: &[MatchRecord]) -> Vec<MatchFeatures> {
        let mut order: Vec<usize> = (0..matches.len()).collect();
        order.sort_by_key(|&i| matches[i].date);

        let mut output = vec![MatchFeatures::default(); matches.len()];
        let mut table = TeamStatisticsComputer::new();
        let mut form = RollingForm::new(self.config.window_size, self.config.min_required);

        for day in order.chunk_by(|&a, &b| matches[a].date == matches[b].date) {
            for &i in day {
                output[i] = self.features_before(&matches[i], &table, &form);
            }

            for &i in day {
                table.add_match(&matches[i]);
                form.add_match(&matches[i]);
            }

            if self.config.cumulative_cutoff == CutoffPolicy::Inclusive {
                for &i in day {
                    let record = &matches[i];
                    output[i].home_gained =
                        table.points(&record.season, &record.div, &record.home_team);
                    output[i].away_gained =
                        table.points(&record.season, &record.div, &record.away_team);
                }
            }
        }

        log::debug!("Tracked {} team-season partitions", table.len());
        output
    }

    fn features_before(
        &self,
        record: &MatchRecord,
        table: &TeamStatisticsComputer<'_>,
        form: &RollingForm<'_>,
    ) -> MatchFeatures {
        let season = record.season.as_str();
        let div = record.div.as_str();

        let mut features = MatchFeatures {
            home_points: record.home_points(),
            away_points: record.away_points(),
            home_gained: table.points(season, div, &record.home_team),
            away_gained: table.points(season, div, &record.away_team),
            ..Default::default()
        };

        if self.config.form {
            features.home_form = form.get(&record.home_team);
            features.away_form = form.get(&record.away_team);
        }

        if self.config.rates {
            let role_rate = |role: Role, outcome: Outcome| {
                table
                    .rate(season, div, record.team(role), role, outcome)
                    .map(|r| round_to(r, RATE_DECIMALS))
            };
            features.home_win_rate = role_rate(Role::Home, Outcome::Win);
            features.home_draw_rate = role_rate(Role::Home, Outcome::Draw);
            features.away_win_rate = role_rate(Role::Away, Outcome::Win);
            features.away_draw_rate = role_rate(Role::Away, Outcome::Draw);
        }

        if self.config.days_since_start {
            features.days_since_start = self.calendar.days_since_start(record.date);
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FullTimeResult;
    use chrono::NaiveDate;

    fn make_match(
        home: &str,
        away: &str,
        date: NaiveDate,
        season: &str,
        result: FullTimeResult,
    ) -> MatchRecord {
        MatchRecord {
            date,
            season: season.to_string(),
            div: "E0".to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            result,
            extra: Vec::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(records: Vec<MatchRecord>) -> MatchDataset {
        MatchDataset {
            records,
            extra_columns: Vec::new(),
        }
    }

    /// Two seasons of a four-team league, with a shared matchday and rows
    /// out of date order.
    fn league() -> Vec<MatchRecord> {
        use FullTimeResult::*;
        let s1 = "2021-2022";
        let s2 = "2022-2023";
        vec![
            make_match("A", "B", date(2021, 8, 14), s1, Home),
            make_match("C", "D", date(2021, 8, 14), s1, Draw),
            make_match("B", "C", date(2021, 8, 28), s1, Away),
            make_match("A", "C", date(2021, 8, 21), s1, Home),
            make_match("D", "B", date(2021, 8, 21), s1, Draw),
            make_match("D", "A", date(2021, 8, 28), s1, Away),
            make_match("C", "A", date(2021, 9, 4), s1, Draw),
            make_match("B", "D", date(2021, 9, 4), s1, Home),
            make_match("A", "D", date(2021, 9, 11), s1, Away),
            make_match("C", "B", date(2021, 9, 11), s1, Home),
            make_match("B", "A", date(2022, 8, 6), s2, Draw),
            make_match("D", "C", date(2022, 8, 6), s2, Home),
            make_match("A", "D", date(2022, 8, 13), s2, Home),
            make_match("C", "B", date(2022, 8, 13), s2, Away),
        ]
    }

    #[test]
    fn test_points_columns() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let features = engine.compute(&dataset(league()));

        assert_eq!((features[0].home_points, features[0].away_points), (3, 0));
        assert_eq!((features[1].home_points, features[1].away_points), (1, 1));
        assert_eq!((features[2].home_points, features[2].away_points), (0, 3));
    }

    #[test]
    fn test_cumulative_after_home_win() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let features = engine.compute(&dataset(league()));

        // Opening day: nothing earlier in the season
        assert_eq!(features[0].home_gained, 0);
        assert_eq!(features[0].away_gained, 0);
        // A's next home match carries the three points from the opener
        assert_eq!(features[3].home_gained, 3);
        assert_eq!(features[3].away_gained, 1);
        // New season starts from zero
        assert_eq!(features[10].home_gained, 0);
        assert_eq!(features[10].away_gained, 0);
    }

    #[test]
    fn test_inclusive_cutoff_counts_same_day() {
        let config = FeatureConfig {
            cumulative_cutoff: CutoffPolicy::Inclusive,
            ..Default::default()
        };
        let engine = FeatureEngine::new(config);
        let features = engine.compute(&dataset(league()));

        // The current match itself is counted
        assert_eq!(features[0].home_gained, 3);
        assert_eq!(features[0].away_gained, 0);
        assert_eq!(features[3].home_gained, 6);
    }

    #[test]
    fn test_form_needs_five_matches() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let features = engine.compute(&dataset(league()));

        // A has four earlier matches on 2021-09-11
        assert_eq!(features[8].home_form, None);
        // Fifth earlier match on 2022-08-06, across the season boundary:
        // 3 + 3 + 3 + 1 + 0
        assert_eq!(features[10].away_form, Some(2.0));
        // B: 0 + 0 + 1 + 3 + 0
        assert_eq!(features[10].home_form, Some(4.0 / 5.0));
    }

    #[test]
    fn test_rates_missing_without_role_history() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let features = engine.compute(&dataset(league()));

        // D hosts for the first time in 2022-2023
        assert_eq!(features[11].home_win_rate, None);
        assert_eq!(features[11].home_draw_rate, None);
        // A at home in 2021-2022 before 2021-09-11: two wins
        assert_eq!(features[8].home_win_rate, Some(1.0));
        assert_eq!(features[8].home_draw_rate, Some(0.0));
        // D away before 2021-09-11: a draw at C and a loss at B
        assert_eq!(features[8].away_win_rate, Some(0.0));
        assert_eq!(features[8].away_draw_rate, Some(0.5));
    }

    fn in_division(mut record: MatchRecord, div: &str) -> MatchRecord {
        record.div = div.to_string();
        record
    }

    /// The league plus an E1 side schedule for A, on E0 matchdays
    fn two_divisions() -> Vec<MatchRecord> {
        use FullTimeResult::*;
        let s1 = "2021-2022";
        let mut matches = league();
        matches.extend([
            in_division(make_match("A", "X", date(2021, 8, 14), s1, Away), "E1"),
            in_division(make_match("X", "A", date(2021, 8, 21), s1, Home), "E1"),
            in_division(make_match("A", "Y", date(2021, 8, 28), s1, Draw), "E1"),
            in_division(make_match("Y", "X", date(2021, 8, 28), s1, Home), "E1"),
        ]);
        matches
    }

    #[test]
    fn test_divisions_kept_apart() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let features = engine.compute(&dataset(two_divisions()));

        // E0 points ignore A's E1 defeats
        assert_eq!(features[3].home_gained, 3);
        assert_eq!(features[5].away_gained, 6);
        // E1 points ignore A's E0 wins
        assert_eq!(features[15].home_gained, 3);
        assert_eq!(features[15].away_gained, 0);
        assert_eq!(features[16].home_gained, 0);
        // A's only earlier E1 home match was lost
        assert_eq!(features[16].home_win_rate, Some(0.0));
        assert_eq!(features[16].home_draw_rate, Some(0.0));
        // E0 home rate unaffected
        assert_eq!(features[8].home_win_rate, Some(1.0));
    }

    #[test]
    fn test_strategies_agree() {
        let matches = two_divisions();
        for cutoff in [CutoffPolicy::Strict, CutoffPolicy::Inclusive] {
            let config = FeatureConfig {
                cumulative_cutoff: cutoff,
                window_size: 3,
                min_required: 3,
                days_since_start: true,
                ..Default::default()
            };
            let engine = FeatureEngine::new(config);
            assert_eq!(
                engine.compute_scan(&matches),
                engine.compute_incremental(&matches)
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        let data = dataset(league());
        assert_eq!(engine.compute(&data), engine.compute(&data));
    }

    #[test]
    fn test_rates_within_unit_interval() {
        let engine = FeatureEngine::new(FeatureConfig::default());
        for row in engine.compute(&dataset(league())) {
            for value in [
                row.home_win_rate,
                row.home_draw_rate,
                row.away_win_rate,
                row.away_draw_rate,
            ]
            .into_iter()
            .flatten()
            {
                assert!((0.0..=1.0).contains(&value));
                assert_eq!(round_to(value, 3), value);
            }
        }
    }

    #[test]
    fn test_columns_follow_config() {
        let config = FeatureConfig {
            form: false,
            rates: false,
            days_since_start: true,
            ..Default::default()
        };
        let engine = FeatureEngine::new(config);
        let names: Vec<_> = engine.columns().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["HomePoints", "AwayPoints", "HP_GAINED", "AP_GAINED", "DAYS_SINCE_START"]
        );

        let features = engine.compute(&dataset(league()));
        assert_eq!(features[0].home_form, None);
        assert_eq!(features[0].days_since_start, Some(44));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.features.days_since_start = true;
        config.seasons = vec![crate::features::SeasonWindow {
            id: "2021-2022".to_string(),
            start: date(2021, 8, 1),
            end: date(2022, 5, 31),
        }];
        let engine = FeatureEngine::from_config(&config).unwrap();
        let features = engine.compute(&dataset(league()));
        assert_eq!(features[0].days_since_start, Some(13));
        assert_eq!(features[10].days_since_start, None);

        config.features.window_size = 0;
        assert!(FeatureEngine::from_config(&config).is_err());
    }

    #[test]
    fn test_missing_cells() {
        let features = MatchFeatures::default();
        assert_eq!(Column::HomeForm.format(&features, "NA"), "NA");
        assert_eq!(Column::HomeGained.format(&features, "NA"), "0");
        assert_eq!(Column::AwayWinRate.to_json(&features), Value::Null);
    }
}
