//! Home/away win and draw rates
//!
//! Rates are taken over the matches a team played in one role only, within
//! the current season and division.

use chrono::NaiveDate;

use super::history::select_by_role;
use crate::{FullTimeResult, MatchRecord, Outcome, Role};

/// Decimal places kept on rates by default
pub const RATE_DECIMALS: u32 = 3;

/// Full-time result that counts as `outcome` for a team playing `role`
pub fn counted_result(role: Role, outcome: Outcome) -> FullTimeResult {
    match (role, outcome) {
        (Role::Home, Outcome::Win) => FullTimeResult::Home,
        (Role::Away, Outcome::Win) => FullTimeResult::Away,
        (_, Outcome::Draw) => FullTimeResult::Draw,
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Share of `matches` with the counted result; None for an empty slice
pub fn outcome_rate(matches: &[&MatchRecord], role: Role, outcome: Outcome) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let target = counted_result(role, outcome);
    let hits = matches.iter().filter(|m| m.result == target).count();
    Some(hits as f64 / matches.len() as f64)
}

/// Rate of `outcome` for `team` playing `role` before `cutoff`, rounded to
/// three decimals.
pub fn rate(
    history: &[MatchRecord],
    team: &str,
    cutoff: NaiveDate,
    season: &str,
    div: &str,
    role: Role,
    outcome: Outcome,
) -> Option<f64> {
    let matches = select_by_role(history, team, cutoff, season, div, role);
    outcome_rate(&matches, role, outcome).map(|r| round_to(r, RATE_DECIMALS))
}
