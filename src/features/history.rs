//! History selection
//!
//! Picks the matches a team played before a cutoff date. Every aggregator
//! reads its history through one of these selectors.

use chrono::NaiveDate;

use crate::{MatchRecord, Role};

/// Matches for `team` in one season and division, before `cutoff`.
///
/// With `inclusive` set, matches played on `cutoff` itself are kept too.
/// Sorted most recent first.
pub fn select<'a>(
    matches: &'a [MatchRecord],
    team: &str,
    cutoff: NaiveDate,
    season: &str,
    div: &str,
    inclusive: bool,
) -> Vec<&'a MatchRecord> {
    most_recent_first(matches, |m| {
        m.same_partition(season, div)
            && (m.date < cutoff || (inclusive && m.date == cutoff))
            && m.involves(team)
    })
}

/// Matches where `team` played the given role, in one season and division,
/// strictly before `cutoff`. Sorted most recent first.
pub fn select_by_role<'a>(
    matches: &'a [MatchRecord],
    team: &str,
    cutoff: NaiveDate,
    season: &str,
    div: &str,
    role: Role,
) -> Vec<&'a MatchRecord> {
    most_recent_first(matches, |m| {
        m.same_partition(season, div) && m.date < cutoff && m.team(role) == team
    })
}

/// All matches for `team` strictly before `cutoff`, across seasons and
/// divisions. Sorted most recent first.
pub fn select_recent<'a>(
    matches: &'a [MatchRecord],
    team: &str,
    cutoff: NaiveDate,
) -> Vec<&'a MatchRecord> {
    most_recent_first(matches, |m| m.date < cutoff && m.involves(team))
}

/// Filter and order by date descending; same-date rows come out in reverse
/// input order.
fn most_recent_first<'a, F>(matches: &'a [MatchRecord], keep: F) -> Vec<&'a MatchRecord>
where
    F: Fn(&MatchRecord) -> bool,
{
    let mut selected: Vec<(usize, &MatchRecord)> = matches
        .iter()
        .enumerate()
        .filter(|(_, m)| keep(m))
        .collect();

    selected.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
    selected.into_iter().map(|(_, m)| m).collect()
}
