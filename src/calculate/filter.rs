//! Split filter engine: narrows a team's games by venue, opponent and recency.

use std::cmp::Reverse;
use std::fmt;

use crate::models::{FilterSpec, GameRecord, OpponentScope, TeamCode, Venue};

/// Games of `team` matching `spec`, finished only, newest first, truncated to `last_n`.
///
/// Returns fewer than `last_n` games when fewer match; see [`sample_notice`].
pub fn filter_team_games(games: &[GameRecord], team: &TeamCode, spec: &FilterSpec) -> Vec<GameRecord> {
    let mut selected: Vec<GameRecord> = games
        .iter()
        .filter(|g| g.involves(team))
        .filter(|g| match spec.venue {
            Some(Venue::Home) => g.home_team == *team,
            Some(Venue::Away) => g.away_team == *team,
            None => true,
        })
        .filter(|g| opponent_matches(g, team, spec.opponent()))
        .filter(|g| g.is_finished())
        .cloned()
        .collect();

    sort_newest_first(&mut selected);

    if let Some(n) = spec.limit() {
        selected.truncate(n);
    }
    selected
}

fn opponent_matches(game: &GameRecord, team: &TeamCode, scope: OpponentScope) -> bool {
    let Some(opponent) = game.opponent(team) else {
        return false;
    };
    match scope {
        OpponentScope::Any => true,
        OpponentScope::Division(division) => opponent.division() == Some(division),
        OpponentScope::Conference(conference) => opponent.conference() == Some(conference),
    }
}

/// Stable sort by kickoff, newest first; games without a kickoff go last.
pub fn sort_newest_first(games: &mut [GameRecord]) {
    games.sort_by_key(|g| Reverse(g.kickoff_at()));
}

/// Most recent meetings listed for a pair.
pub const HEAD_TO_HEAD_LIMIT: usize = 5;

/// Games dated inside `season`'s August to February window.
pub fn season_games(games: &[GameRecord], season: i32) -> Vec<GameRecord> {
    games.iter().filter(|g| g.in_season(season)).cloned().collect()
}

/// Finished meetings between two teams, newest first, at most [`HEAD_TO_HEAD_LIMIT`].
pub fn head_to_head(games: &[GameRecord], a: &TeamCode, b: &TeamCode) -> Vec<GameRecord> {
    let mut meetings: Vec<GameRecord> = games
        .iter()
        .filter(|g| g.is_finished() && g.involves(a) && g.involves(b))
        .cloned()
        .collect();
    sort_newest_first(&mut meetings);
    meetings.truncate(HEAD_TO_HEAD_LIMIT);
    meetings
}

/// Whether a filtered sample can support the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleNotice {
    Sufficient,
    /// No game matched the filter combination
    Empty,
    /// Fewer games than `last_n` requested
    Insufficient { available: usize, requested: usize },
}

impl SampleNotice {
    pub fn is_warning(&self) -> bool {
        !matches!(self, SampleNotice::Sufficient)
    }
}

impl fmt::Display for SampleNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleNotice::Sufficient => Ok(()),
            SampleNotice::Empty => write!(f, "no results for this filter combination"),
            SampleNotice::Insufficient {
                available,
                requested,
            } => write!(f, "insufficient games ({} of {})", available, requested),
        }
    }
}

/// Compare the filtered count with the requested window.
pub fn sample_notice(available: usize, spec: &FilterSpec) -> SampleNotice {
    if available == 0 {
        return SampleNotice::Empty;
    }
    match spec.limit() {
        Some(requested) if available < requested => SampleNotice::Insufficient {
            available,
            requested,
        },
        _ => SampleNotice::Sufficient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Conference, Division, Region};

    fn kc() -> TeamCode {
        TeamCode::new("KC")
    }

    fn season() -> Vec<GameRecord> {
        vec![
            GameRecord::new("KC", "BAL", "2024-09-05").with_score(27, 20),
            GameRecord::new("ATL", "KC", "2024-09-22").with_score(17, 22),
            GameRecord::new("KC", "LAC", "2024-12-08").with_score(19, 17),
            GameRecord::new("BUF", "KC", "2024-11-17").with_score(30, 21),
            GameRecord::new("KC", "DEN", "2025-01-05").with_score(0, 38),
            GameRecord::new("LV", "KC", "2025-11-23"),
            GameRecord::new("SF", "DAL", "2024-10-27").with_score(30, 24),
        ]
    }

    fn dates(games: &[GameRecord]) -> Vec<&str> {
        games.iter().filter_map(|g| g.date_str()).collect()
    }

    #[test]
    fn test_team_games_newest_first_finished_only() {
        let out = filter_team_games(&season(), &kc(), &FilterSpec::new());
        assert_eq!(
            dates(&out),
            vec!["2025-01-05", "2024-12-08", "2024-11-17", "2024-09-22", "2024-09-05"]
        );
    }

    #[test]
    fn test_venue_filter() {
        let home = filter_team_games(&season(), &kc(), &FilterSpec::new().with_venue(Venue::Home));
        assert!(home.iter().all(|g| g.home_team == kc()));
        assert_eq!(home.len(), 3);

        let away = filter_team_games(&season(), &kc(), &FilterSpec::new().with_venue(Venue::Away));
        assert_eq!(dates(&away), vec!["2024-11-17", "2024-09-22"]);
    }

    #[test]
    fn test_opponent_division_beats_conference() {
        let spec = FilterSpec::new()
            .with_opponent_conference(Conference::Nfc)
            .with_opponent_division(Division::new(Conference::Afc, Region::West));
        let out = filter_team_games(&season(), &kc(), &spec);
        assert_eq!(dates(&out), vec!["2025-01-05", "2024-12-08"]);
    }

    #[test]
    fn test_opponent_conference() {
        let spec = FilterSpec::new().with_opponent_conference(Conference::Nfc);
        let out = filter_team_games(&season(), &kc(), &spec);
        assert_eq!(dates(&out), vec!["2024-09-22"]);
    }

    #[test]
    fn test_last_n_applied_after_other_filters() {
        let spec = FilterSpec::new().with_venue(Venue::Home).with_last_n(2);
        let out = filter_team_games(&season(), &kc(), &spec);
        assert_eq!(dates(&out), vec!["2025-01-05", "2024-12-08"]);
    }

    #[test]
    fn test_insufficient_sample_returns_all() {
        // 3 finished home games, 5 requested
        let spec = FilterSpec::new().with_venue(Venue::Home).with_last_n(5);
        let out = filter_team_games(&season(), &kc(), &spec);
        assert_eq!(out.len(), 3);

        let notice = sample_notice(out.len(), &spec);
        assert_eq!(
            notice,
            SampleNotice::Insufficient {
                available: 3,
                requested: 5
            }
        );
        assert_eq!(notice.to_string(), "insufficient games (3 of 5)");
    }

    #[test]
    fn test_empty_notice() {
        let notice = sample_notice(0, &FilterSpec::new().with_last_n(3));
        assert_eq!(notice, SampleNotice::Empty);
        assert_eq!(notice.to_string(), "no results for this filter combination");
        assert!(!sample_notice(4, &FilterSpec::new()).is_warning());
        assert!(!sample_notice(5, &FilterSpec::new().with_last_n(5)).is_warning());
    }

    #[test]
    fn test_last_n_never_grows_the_result() {
        let games = season();
        let specs = [
            FilterSpec::new(),
            FilterSpec::new().with_venue(Venue::Home),
            FilterSpec::new().with_venue(Venue::Away),
            FilterSpec::new().with_opponent_conference(Conference::Afc),
            FilterSpec::new().with_opponent_division(Division::new(Conference::Afc, Region::North)),
        ];
        for team in ["KC", "SF", "BUF", "NYG"] {
            let team = TeamCode::new(team);
            for spec in &specs {
                let unbounded = filter_team_games(&games, &team, spec).len();
                for n in 0..7 {
                    let bounded = filter_team_games(&games, &team, &spec.clone().with_last_n(n)).len();
                    assert!(bounded <= unbounded);
                    let expected = if n == 0 { unbounded } else { unbounded.min(n) };
                    assert_eq!(bounded, expected);
                }
            }
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let games = season();
        let before = games.clone();
        let _ = filter_team_games(&games, &kc(), &FilterSpec::new().with_last_n(1));
        assert_eq!(games, before);
    }

    #[test]
    fn test_unknown_opponent_never_matches_opponent_filter() {
        let games = vec![GameRecord::new("KC", "XYZ", "2024-09-05").with_score(10, 3)];
        let spec = FilterSpec::new().with_opponent_conference(Conference::Afc);
        assert!(filter_team_games(&games, &kc(), &spec).is_empty());
        assert_eq!(filter_team_games(&games, &kc(), &FilterSpec::new()).len(), 1);
    }

    #[test]
    fn test_head_to_head() {
        let mut games = season();
        games.push(GameRecord::new("KC", "BUF", "2024-01-21").with_score(24, 27));
        let meetings = head_to_head(&games, &kc(), &TeamCode::new("BUF"));
        assert_eq!(dates(&meetings), vec!["2024-11-17", "2024-01-21"]);
    }

    #[test]
    fn test_head_to_head_keeps_five_most_recent() {
        let games: Vec<GameRecord> = (2016..2024)
            .map(|year| {
                GameRecord::new("KC", "BUF", &format!("{}-10-15", year)).with_score(20, 17)
            })
            .collect();
        let meetings = head_to_head(&games, &kc(), &TeamCode::new("BUF"));
        assert_eq!(meetings.len(), HEAD_TO_HEAD_LIMIT);
        assert_eq!(meetings[0].date_str(), Some("2023-10-15"));
        assert_eq!(meetings[4].date_str(), Some("2019-10-15"));
    }

    #[test]
    fn test_zero_last_n_keeps_every_game() {
        let spec = FilterSpec::new().with_last_n(0);
        let out = filter_team_games(&season(), &kc(), &spec);
        assert_eq!(out.len(), 5);
        assert_eq!(sample_notice(out.len(), &spec), SampleNotice::Sufficient);
        assert_eq!(spec.to_wire().last_n, None);
    }

    #[test]
    fn test_season_games_window() {
        let mut games = season();
        games.push(GameRecord::new("BUF", "KC", "2024-01-21").with_score(24, 27));
        let in_2024 = season_games(&games, 2024);
        assert_eq!(in_2024.len(), 6);
        assert!(in_2024.iter().all(|g| g.date_str() != Some("2025-11-23")));
        assert_eq!(dates(&season_games(&games, 2023)), vec!["2024-01-21"]);
    }
}
