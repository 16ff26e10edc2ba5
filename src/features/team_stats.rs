//! Team statistics computation
//!
//! Running season totals per team, kept per season and division.

use std::collections::HashMap;

use super::rates::counted_result;
use crate::{FullTimeResult, MatchRecord, Outcome, Role};

/// Results in one role (home or away)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleTally {
    pub played: usize,
    pub wins: usize,
    pub draws: usize,
}

impl RoleTally {
    fn record(&mut self, role: Role, result: FullTimeResult) {
        self.played += 1;
        if result == counted_result(role, Outcome::Win) {
            self.wins += 1;
        } else if result == counted_result(role, Outcome::Draw) {
            self.draws += 1;
        }
    }

    /// Share of matches ending in `outcome`, None if nothing was played
    pub fn rate(&self, outcome: Outcome) -> Option<f64> {
        if self.played == 0 {
            return None;
        }
        let hits = match outcome {
            Outcome::Win => self.wins,
            Outcome::Draw => self.draws,
        };
        Some(hits as f64 / self.played as f64)
    }
}

/// Season-to-date statistics for a team
#[derive(Debug, Clone, Default)]
pub struct TeamStatistics {
    /// Total matches played
    pub matches_played: usize,
    /// League points collected
    pub points: u32,
    /// Matches as home side
    pub home: RoleTally,
    /// Matches as away side
    pub away: RoleTally,
}

impl TeamStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update statistics with a match result
    pub fn update(&mut self, record: &MatchRecord, team: &str) {
        let Some(role) = record.role_of(team) else {
            return;
        };

        self.matches_played += 1;
        self.points += record.points_for(team);

        match role {
            Role::Home => self.home.record(role, record.result),
            Role::Away => self.away.record(role, record.result),
        }
    }

    pub fn tally(&self, role: Role) -> &RoleTally {
        match role {
            Role::Home => &self.home,
            Role::Away => &self.away,
        }
    }
}

type TeamKey<'a> = (&'a str, &'a str, &'a str);

/// Statistics for every team, partitioned by season and division
pub struct TeamStatisticsComputer<'a> {
    /// Statistics by (season, division, team)
    stats: HashMap<TeamKey<'a>, TeamStatistics>,
}

impl<'a> TeamStatisticsComputer<'a> {
    pub fn new() -> Self {
        TeamStatisticsComputer {
            stats: HashMap::new(),
        }
    }

    /// Add one finished match to both teams
    pub fn add_match(&mut self, record: &'a MatchRecord) {
        let season = record.season.as_str();
        let div = record.div.as_str();

        self.stats
            .entry((season, div, record.home_team.as_str()))
            .or_default()
            .update(record, &record.home_team);

        self.stats
            .entry((season, div, record.away_team.as_str()))
            .or_default()
            .update(record, &record.away_team);
    }

    /// Get statistics for a team
    ///
    /// The keys only need to live as long as the returned borrow, so they can
    /// come from any record.
    pub fn get<'s>(
        &'s self,
        season: &'s str,
        div: &'s str,
        team: &'s str,
    ) -> Option<&'s TeamStatistics> {
        let stats: &'s HashMap<TeamKey<'s>, TeamStatistics> = &self.stats;
        stats.get(&(season, div, team))
    }

    /// Season-to-date points, 0 for a team not seen yet
    pub fn points(&self, season: &str, div: &str, team: &str) -> u32 {
        self.get(season, div, team).map(|s| s.points).unwrap_or(0)
    }

    /// Unrounded role-conditioned rate
    pub fn rate(
        &self,
        season: &str,
        div: &str,
        team: &str,
        role: Role,
        outcome: Outcome,
    ) -> Option<f64> {
        self.get(season, div, team)?.tally(role).rate(outcome)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl Default for TeamStatisticsComputer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
