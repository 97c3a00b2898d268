//! Threshold-crossing counts, shared by local aggregation and the backend trends payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TeamCode;

/// Games at or above a line (`over`) and below it (`under`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverUnder {
    pub over: u32,
    pub under: u32,
}

/// Games won / lost by at least a margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginCount {
    pub win_by: u32,
    pub lose_by: u32,
}

/// Win/loss/tie counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossTie {
    #[serde(rename = "w")]
    pub wins: u32,
    #[serde(rename = "l")]
    pub losses: u32,
    #[serde(rename = "t")]
    pub ties: u32,
}

impl WinLossTie {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties as half a win; None for an empty record.
    pub fn win_pct(&self) -> Option<f64> {
        let games = self.total();
        (games > 0).then(|| (self.wins as f64 + 0.5 * self.ties as f64) / games as f64)
    }

    /// Credit one result from `team` points vs `opponent` points.
    pub fn record(&mut self, team: u32, opponent: u32) {
        match team.cmp(&opponent) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }
}

/// Win/loss/tie per game segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossCounts {
    #[serde(default)]
    pub game: WinLossTie,
    #[serde(default)]
    pub h1: WinLossTie,
    #[serde(default)]
    pub h2: WinLossTie,
}

/// Field-goal line counts; keys are the line labels ("1.5", "0.5").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGoalCounts {
    #[serde(default)]
    pub game: BTreeMap<String, OverUnder>,
    #[serde(default)]
    pub h1: BTreeMap<String, OverUnder>,
    #[serde(default)]
    pub h2: BTreeMap<String, OverUnder>,
}

/// All count sections of a trends result. Total-line keys are integer points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendCounts {
    #[serde(default)]
    pub game: BTreeMap<u32, OverUnder>,
    #[serde(default)]
    pub h1: BTreeMap<u32, OverUnder>,
    #[serde(default)]
    pub h2: BTreeMap<u32, OverUnder>,
    #[serde(default)]
    pub margin: BTreeMap<u32, MarginCount>,
    #[serde(default)]
    pub fg: FieldGoalCounts,
    #[serde(default)]
    pub wl: WinLossCounts,
}

/// Pre-aggregated counts returned by the trends endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendsPayload {
    #[serde(default)]
    pub team: Option<TeamCode>,

    #[serde(default)]
    pub season: Option<i32>,

    /// Games the backend aggregated over
    #[serde(default)]
    pub games: u32,

    #[serde(default)]
    pub counts: TrendCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_pct() {
        assert_eq!(WinLossTie::default().win_pct(), None);
        let record = |wins, losses, ties| WinLossTie { wins, losses, ties };
        assert_eq!(record(3, 1, 0).win_pct(), Some(0.75));
        assert_eq!(record(1, 0, 1).win_pct(), Some(0.75));
    }

    #[test]
    fn test_record_results() {
        let mut wlt = WinLossTie::default();
        wlt.record(27, 24);
        wlt.record(10, 10);
        wlt.record(3, 17);
        assert_eq!(
            wlt,
            WinLossTie {
                wins: 1,
                losses: 1,
                ties: 1
            }
        );
        assert_eq!(wlt.total(), 3);
    }

    #[test]
    fn test_payload_parses_backend_shape() {
        let json = r#"{
            "status": "success",
            "season": 2025,
            "team": "KC",
            "games": 4,
            "counts": {
                "game": {"17": {"over": 4, "under": 0}, "30": {"over": 1, "under": 3}},
                "h1": {"3": {"over": 4, "under": 0}},
                "h2": {},
                "margin": {"7": {"win_by": 2, "lose_by": 1}},
                "fg": {"game": {"1.5": {"over": 2, "under": 2}}, "h1": {}, "h2": {}},
                "wl": {"game": {"w": 3, "l": 1, "t": 0}, "h1": {"w": 2, "l": 2, "t": 0}, "h2": {"w": 1, "l": 2, "t": 1}}
            }
        }"#;
        let payload: TrendsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.games, 4);
        assert_eq!(payload.counts.game[&30], OverUnder { over: 1, under: 3 });
        assert_eq!(payload.counts.margin[&7].win_by, 2);
        assert_eq!(payload.counts.fg.game["1.5"].over, 2);
        assert_eq!(payload.counts.wl.h2.ties, 1);
    }

    #[test]
    fn test_payload_with_empty_counts() {
        let payload: TrendsPayload =
            serde_json::from_str(r#"{"status": "success", "games": 0, "counts": {}}"#).unwrap();
        assert_eq!(payload.games, 0);
        assert_eq!(payload.counts, TrendCounts::default());
    }
}
