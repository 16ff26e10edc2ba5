//! League points
//!
//! Per-match points (3 for a win, 1 for a draw) and season-to-date totals.

use crate::MatchRecord;

/// Points a team collected over the given matches, whichever side it played.
pub fn cumulative_points<'a, I>(team: &str, matches: I) -> u32
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    matches.into_iter().map(|m| m.points_for(team)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FullTimeResult;
    use chrono::NaiveDate;

    fn make_match(home: &str, away: &str, result: FullTimeResult) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2021, 8, 14).unwrap(),
            season: "2021-2022".to_string(),
            div: "E0".to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            result,
            extra: Vec::new(),
        }
    }

    #[test]
    fn test_cumulative_points_either_side() {
        let matches = vec![
            make_match("A", "B", FullTimeResult::Home),
            make_match("C", "A", FullTimeResult::Draw),
            make_match("B", "A", FullTimeResult::Away),
            make_match("A", "C", FullTimeResult::Away),
        ];

        assert_eq!(cumulative_points("A", &matches), 3 + 1 + 3);
        assert_eq!(cumulative_points("B", &matches), 0);
        assert_eq!(cumulative_points("C", &matches), 1 + 3);
    }

    #[test]
    fn test_no_matches_is_zero() {
        let matches: Vec<MatchRecord> = Vec::new();
        assert_eq!(cumulative_points("A", &matches), 0);
    }
}
