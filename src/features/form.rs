//! Rolling form
//!
//! Average points per game over a team's most recent matches, across season
//! and division boundaries.

use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};

use super::history::select_recent;
use super::points::cumulative_points;
use crate::MatchRecord;

/// Average points over the last `window_size` matches `team` played before
/// `cutoff`.
///
/// Undefined until the team has at least `min_required` earlier matches. The
/// divisor is always `window_size`.
pub fn rolling_form(
    team: &str,
    cutoff: NaiveDate,
    history: &[MatchRecord],
    window_size: usize,
    min_required: usize,
) -> Option<f64> {
    if window_size == 0 {
        return None;
    }

    let recent = select_recent(history, team, cutoff);
    if recent.len() < min_required {
        return None;
    }

    let total = cumulative_points(team, recent.into_iter().take(window_size));
    Some(total as f64 / window_size as f64)
}

#[derive(Debug, Clone, Default)]
struct TeamForm {
    /// Points from the latest matches, oldest first
    recent: VecDeque<u32>,
    /// Matches seen so far
    played: usize,
}

/// Rolling form kept up to date as matches are added in date order
pub struct RollingForm<'a> {
    window_size: usize,
    min_required: usize,
    teams: HashMap<&'a str, TeamForm>,
}

impl<'a> RollingForm<'a> {
    pub fn new(window_size: usize, min_required: usize) -> Self {
        RollingForm {
            window_size,
            min_required,
            teams: HashMap::new(),
        }
    }

    /// Add a finished match to both teams' windows
    pub fn add_match(&mut self, record: &'a MatchRecord) {
        self.push(&record.home_team, record.home_points());
        self.push(&record.away_team, record.away_points());
    }

    fn push(&mut self, team: &'a str, points: u32) {
        let form = self.teams.entry(team).or_default();
        form.recent.push_back(points);
        if form.recent.len() > self.window_size {
            form.recent.pop_front();
        }
        form.played += 1;
    }

    /// Current form for a team, None while its history is too short
    pub fn get(&self, team: &str) -> Option<f64> {
        if self.window_size == 0 {
            return None;
        }
        let form = self.teams.get(team)?;
        if form.played < self.min_required {
            return None;
        }
        let total: u32 = form.recent.iter().sum();
        Some(total as f64 / self.window_size as f64)
    }
}
