//! Win/loss and threshold-crossing aggregation over a filtered game list.

use std::collections::BTreeMap;

use super::filter::filter_team_games;
use crate::models::{
    FilterSpec, GameRecord, MarginCount, OverUnder, TeamCode, TrendCounts, WinLossTie,
};

/// Full-game team-points lines.
pub const GAME_TOTAL_LINES: [u32; 6] = [17, 20, 23, 24, 27, 30];

/// Per-half team-points lines.
pub const HALF_TOTAL_LINES: [u32; 6] = [3, 6, 7, 10, 13, 17];

/// Winning/losing margins.
pub const MARGIN_LINES: [u32; 6] = [3, 4, 6, 7, 10, 13];

/// A half-point betting line on an integer stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfPointLine {
    pub label: &'static str,
    /// Smallest value counted as over
    pub over_at: u32,
}

/// Made field goals per game: 1.5 and 2.5.
pub const FG_GAME_LINES: [HalfPointLine; 2] = [
    HalfPointLine {
        label: "1.5",
        over_at: 2,
    },
    HalfPointLine {
        label: "2.5",
        over_at: 3,
    },
];

/// Made field goals per half: 0.5 and 1.5.
pub const FG_HALF_LINES: [HalfPointLine; 2] = [
    HalfPointLine {
        label: "0.5",
        over_at: 1,
    },
    HalfPointLine {
        label: "1.5",
        over_at: 2,
    },
];

/// Share of games a count must reach to be emphasized.
pub const HIGHLIGHT_RATIO: f64 = 0.75;

/// Counts for one team over a game list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    /// Finished games of the team that were counted
    pub games_used: u32,

    /// Games among those carrying halftime scores
    pub half_games_used: u32,

    /// Games among those carrying made-field-goal data
    pub fg_games_used: u32,

    pub counts: TrendCounts,
}

impl AggregationResult {
    pub fn has_half_data(&self) -> bool {
        self.half_games_used > 0
    }

    pub fn has_fg_data(&self) -> bool {
        self.fg_games_used > 0
    }
}

/// Aggregate results and line crossings for `team` over `games`.
///
/// Point lines count the team's own points, margins its point difference.
/// Unfinished games and games without `team` are skipped. Half-level counts
/// only cover games that carry halftime scores.
pub fn aggregate(games: &[GameRecord], team: &TeamCode) -> AggregationResult {
    let mut result = AggregationResult {
        counts: empty_counts(),
        ..AggregationResult::default()
    };

    for game in games {
        let Some((own, opp)) = game.score_for(team) else {
            continue;
        };
        result.games_used += 1;
        let counts = &mut result.counts;

        counts.wl.game.record(own, opp);
        count_total(&mut counts.game, &GAME_TOTAL_LINES, own);
        count_margin(&mut counts.margin, own as i64 - opp as i64);

        if let Some([h1, h2]) = game.half_scores_for(team) {
            result.half_games_used += 1;
            counts.wl.h1.record(h1.0, h1.1);
            counts.wl.h2.record(h2.0, h2.1);
            count_total(&mut counts.h1, &HALF_TOTAL_LINES, h1.0);
            count_total(&mut counts.h2, &HALF_TOTAL_LINES, h2.0);
        }

        if let Some(fg) = game.field_goals_for(team) {
            result.fg_games_used += 1;
            count_line(&mut counts.fg.game, &FG_GAME_LINES, fg.total());
            count_line(&mut counts.fg.h1, &FG_HALF_LINES, fg.h1);
            count_line(&mut counts.fg.h2, &FG_HALF_LINES, fg.h2);
        }
    }

    result
}

/// Counts with every line present at zero.
fn empty_counts() -> TrendCounts {
    let zero_lines = |lines: &[u32]| -> BTreeMap<u32, OverUnder> {
        lines.iter().map(|l| (*l, OverUnder::default())).collect()
    };
    let zero_fg = |lines: &[HalfPointLine]| -> BTreeMap<String, OverUnder> {
        lines
            .iter()
            .map(|l| (l.label.to_string(), OverUnder::default()))
            .collect()
    };

    let mut counts = TrendCounts {
        game: zero_lines(&GAME_TOTAL_LINES),
        h1: zero_lines(&HALF_TOTAL_LINES),
        h2: zero_lines(&HALF_TOTAL_LINES),
        margin: MARGIN_LINES
            .iter()
            .map(|m| (*m, MarginCount::default()))
            .collect(),
        ..TrendCounts::default()
    };
    counts.fg.game = zero_fg(&FG_GAME_LINES);
    counts.fg.h1 = zero_fg(&FG_HALF_LINES);
    counts.fg.h2 = zero_fg(&FG_HALF_LINES);
    counts
}

/// Over for every line at or below `points`, under for every line above.
fn count_total(buckets: &mut BTreeMap<u32, OverUnder>, lines: &[u32], points: u32) {
    for line in lines {
        let bucket = buckets.entry(*line).or_default();
        if points >= *line {
            bucket.over += 1;
        } else {
            bucket.under += 1;
        }
    }
}

fn count_margin(buckets: &mut BTreeMap<u32, MarginCount>, margin: i64) {
    for line in MARGIN_LINES {
        let bucket = buckets.entry(line).or_default();
        if margin >= line as i64 {
            bucket.win_by += 1;
        } else if margin <= -(line as i64) {
            bucket.lose_by += 1;
        }
    }
}

fn count_line(buckets: &mut BTreeMap<String, OverUnder>, lines: &[HalfPointLine], value: u32) {
    for line in lines {
        let bucket = buckets.entry(line.label.to_string()).or_default();
        if value >= line.over_at {
            bucket.over += 1;
        } else {
            bucket.under += 1;
        }
    }
}

/// `count / games_used`, or None when no games were used.
pub fn highlight_ratio(count: u32, games_used: u32) -> Option<f64> {
    if games_used == 0 {
        None
    } else {
        Some(count as f64 / games_used as f64)
    }
}

/// Whether a count covers at least three quarters of the sample.
pub fn is_highlight(count: u32, games_used: u32) -> bool {
    highlight_ratio(count, games_used).is_some_and(|r| r >= HIGHLIGHT_RATIO)
}

/// Filtered win/loss record of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team: TeamCode,
    pub record: WinLossTie,
}

/// Filtered win/loss record of every team in `teams`.
pub fn win_loss_table(games: &[GameRecord], teams: &[TeamCode], spec: &FilterSpec) -> Vec<TeamRecord> {
    teams
        .iter()
        .map(|team| {
            let mut record = WinLossTie::default();
            for game in filter_team_games(games, team, spec) {
                if let Some((own, opp)) = game.score_for(team) {
                    record.record(own, opp);
                }
            }
            TeamRecord {
                team: team.clone(),
                record,
            }
        })
        .collect()
}

/// Rank by wins (desc), then losses (asc), then team code. 1-based.
pub fn rank_win_loss(records: &[TeamRecord], team: &TeamCode) -> Option<usize> {
    let mut sorted: Vec<&TeamRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.record
            .wins
            .cmp(&a.record.wins)
            .then(a.record.losses.cmp(&b.record.losses))
            .then_with(|| a.team.cmp(&b.team))
    });
    sorted.iter().position(|r| r.team == *team).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HalfSplit, Venue};
    use pretty_assertions::assert_eq;

    fn kc() -> TeamCode {
        TeamCode::new("KC")
    }

    fn opener() -> Vec<GameRecord> {
        vec![GameRecord::new("KC", "BUF", "2024-01-01").with_score(27, 24)]
    }

    #[test]
    fn test_single_win_scenario() {
        let filtered = filter_team_games(&opener(), &kc(), &FilterSpec::new());
        let result = aggregate(&filtered, &kc());

        assert_eq!(result.games_used, 1);
        assert_eq!(result.counts.wl.game.wins, 1);
        assert_eq!(result.counts.wl.game.losses, 0);
        assert_eq!(result.counts.game[&24].over, 1);
        assert_eq!(result.counts.game[&27].over, 1);
        assert_eq!(result.counts.game[&30].over, 0);
        assert_eq!(result.counts.game[&30].under, 1);
        assert_eq!(result.counts.margin[&3].win_by, 1);
        assert_eq!(result.counts.margin[&4].win_by, 0);
    }

    #[test]
    fn test_opponent_points_do_not_count_toward_lines() {
        // 51 combined, but KC scored 13
        let games = vec![GameRecord::new("BUF", "KC", "2024-01-01").with_score(38, 13)];
        let result = aggregate(&games, &kc());
        assert_eq!(result.counts.game[&17].over, 0);
        assert_eq!(result.counts.game[&17].under, 1);
        assert!(result.counts.game.values().all(|c| c.over == 0));
        assert_eq!(result.counts.margin[&13].lose_by, 1);
    }

    #[test]
    fn test_filtered_out_venue_yields_zero_counts() {
        let spec = FilterSpec::new().with_venue(Venue::Away);
        let filtered = filter_team_games(&opener(), &kc(), &spec);
        assert!(filtered.is_empty());

        let result = aggregate(&filtered, &kc());
        assert_eq!(result.games_used, 0);
        assert_eq!(result.counts.wl.game.total(), 0);
        assert!(result.counts.game.values().all(|c| c.over == 0 && c.under == 0));
        assert_eq!(highlight_ratio(0, result.games_used), None);
        assert!(!is_highlight(0, result.games_used));
    }

    #[test]
    fn test_all_lines_present_even_when_empty() {
        let result = aggregate(&[], &kc());
        assert_eq!(result.counts.game.keys().copied().collect::<Vec<_>>(), GAME_TOTAL_LINES.to_vec());
        assert_eq!(result.counts.h2.len(), HALF_TOTAL_LINES.len());
        assert_eq!(result.counts.margin.len(), MARGIN_LINES.len());
        assert_eq!(result.counts.fg.game.len(), 2);
    }

    #[test]
    fn test_over_plus_under_equals_games() {
        let games = vec![
            GameRecord::new("KC", "BUF", "2024-01-01").with_score(27, 24),
            GameRecord::new("DEN", "KC", "2024-01-08").with_score(10, 9),
            GameRecord::new("KC", "LV", "2024-01-15").with_score(14, 14),
        ];
        let result = aggregate(&games, &kc());
        for bucket in result.counts.game.values() {
            assert_eq!(bucket.over + bucket.under, result.games_used);
        }
        assert_eq!(
            result.counts.wl.game,
            WinLossTie {
                wins: 1,
                losses: 1,
                ties: 1
            }
        );
        // one-point loss crosses no margin line, tie neither
        assert!(result.counts.margin.values().all(|m| m.lose_by == 0));
    }

    #[test]
    fn test_over_counts_monotonic_in_line() {
        let games: Vec<GameRecord> = (0..20)
            .map(|i| {
                GameRecord::new("KC", "BUF", &format!("2024-01-{:02}", i + 1))
                    .with_score(i * 2, (i * 7) % 23)
            })
            .collect();
        let result = aggregate(&games, &kc());
        let overs: Vec<u32> = result.counts.game.values().map(|c| c.over).collect();
        assert!(overs.windows(2).all(|w| w[0] >= w[1]));
        let win_by: Vec<u32> = result.counts.margin.values().map(|m| m.win_by).collect();
        assert!(win_by.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_half_counts_when_halftime_known() {
        let games = vec![
            GameRecord::new("KC", "BUF", "2024-01-01")
                .with_score(27, 24)
                .with_halftime(10, 17),
            GameRecord::new("KC", "NE", "2024-01-08").with_score(20, 3),
        ];
        let result = aggregate(&games, &kc());
        assert_eq!(result.games_used, 2);
        assert_eq!(result.half_games_used, 1);
        assert!(result.has_half_data());
        // h1: 10-17 loss, h2: 17-7 win
        assert_eq!(result.counts.wl.h1.losses, 1);
        assert_eq!(result.counts.wl.h2.wins, 1);
        assert_eq!(result.counts.h1[&10].over, 1);
        assert_eq!(result.counts.h1[&13].over, 0);
        assert_eq!(result.counts.h1[&13].under, 1);
        assert_eq!(result.counts.h2[&17].over, 1);
        assert_eq!(result.counts.h1[&3].over + result.counts.h1[&3].under, 1);
    }

    #[test]
    fn test_field_goal_lines() {
        let games = vec![
            GameRecord::new("KC", "BUF", "2024-01-01")
                .with_score(27, 24)
                .with_field_goals(HalfSplit { h1: 2, h2: 1 }, HalfSplit { h1: 0, h2: 1 }),
            GameRecord::new("BUF", "KC", "2024-01-08")
                .with_score(20, 23)
                .with_field_goals(HalfSplit { h1: 1, h2: 1 }, HalfSplit { h1: 0, h2: 1 }),
        ];
        let result = aggregate(&games, &kc());
        assert_eq!(result.fg_games_used, 2);
        // KC made 3 then 1
        assert_eq!(result.counts.fg.game["1.5"], OverUnder { over: 1, under: 1 });
        assert_eq!(result.counts.fg.game["2.5"], OverUnder { over: 1, under: 1 });
        assert_eq!(result.counts.fg.h1["0.5"], OverUnder { over: 1, under: 1 });
        assert_eq!(result.counts.fg.h1["1.5"], OverUnder { over: 1, under: 1 });
        assert_eq!(result.counts.fg.h2["0.5"], OverUnder { over: 2, under: 0 });
    }

    #[test]
    fn test_unfinished_and_foreign_games_skipped() {
        let games = vec![
            GameRecord::new("KC", "BUF", "2024-01-01"),
            GameRecord::new("SF", "DAL", "2024-01-01").with_score(30, 10),
        ];
        assert_eq!(aggregate(&games, &kc()).games_used, 0);
    }

    #[test]
    fn test_highlight_threshold() {
        assert!(is_highlight(3, 4));
        assert!(!is_highlight(2, 4));
        assert!(is_highlight(5, 5));
        assert_eq!(highlight_ratio(1, 4), Some(0.25));
    }

    #[test]
    fn test_win_loss_table_respects_filters() {
        let games = vec![
            GameRecord::new("KC", "BUF", "2024-01-01").with_score(27, 24),
            GameRecord::new("BUF", "KC", "2024-01-08").with_score(31, 17),
            GameRecord::new("KC", "DEN", "2024-01-15").with_score(20, 20),
        ];
        let teams = vec![kc(), TeamCode::new("BUF")];

        let all = win_loss_table(&games, &teams, &FilterSpec::new());
        assert_eq!(all[0].record, WinLossTie { wins: 1, losses: 1, ties: 1 });
        assert_eq!(all[1].record, WinLossTie { wins: 1, losses: 1, ties: 0 });

        let home = win_loss_table(&games, &teams, &FilterSpec::new().with_venue(Venue::Home));
        assert_eq!(home[0].record, WinLossTie { wins: 1, losses: 0, ties: 1 });
        assert_eq!(home[1].record, WinLossTie { wins: 1, losses: 0, ties: 0 });
        assert_eq!(rank_win_loss(&home, &kc()), Some(2));
    }

    #[test]
    fn test_rank_win_loss_order() {
        let rec = |team: &str, wins, losses| TeamRecord {
            team: TeamCode::new(team),
            record: WinLossTie {
                wins,
                losses,
                ties: 0,
            },
        };
        let records = vec![
            rec("NE", 3, 2),
            rec("BUF", 4, 1),
            rec("MIA", 3, 1),
            rec("NYJ", 3, 1),
        ];
        assert_eq!(rank_win_loss(&records, &TeamCode::new("BUF")), Some(1));
        assert_eq!(rank_win_loss(&records, &TeamCode::new("MIA")), Some(2));
        assert_eq!(rank_win_loss(&records, &TeamCode::new("NYJ")), Some(3));
        assert_eq!(rank_win_loss(&records, &TeamCode::new("NE")), Some(4));
        assert_eq!(rank_win_loss(&records, &TeamCode::new("KC")), None);
    }
}
