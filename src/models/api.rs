//! Response shapes of the stats API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    numeric, season_dates, Conference, Division, GameRecord, MetricRow, TeamCode, WinLossTie,
};

/// Season and game-type scope of a stats request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatScope {
    pub season: i32,

    /// "REG", "POST", ...
    pub game_types: String,
}

impl StatScope {
    pub fn new(season: i32, game_types: impl Into<String>) -> Self {
        Self {
            season,
            game_types: game_types.into(),
        }
    }
}

/// Schedule request: a date window, a season, or a week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub season: Option<i32>,
    pub week: Option<u32>,
}

impl ScheduleQuery {
    /// Whole season by season number.
    pub fn season(season: i32) -> Self {
        Self {
            season: Some(season),
            ..Self::default()
        }
    }

    /// Regular season plus playoffs, August 1 to February 15.
    pub fn season_window(season: i32) -> Self {
        let dates = season_dates(season);
        Self {
            start: dates.map(|(start, _)| start.to_string()),
            end: dates.map(|(_, end)| end.to_string()),
            season: Some(season),
            week: None,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = &self.start {
            pairs.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            pairs.push(("end", end.clone()));
        }
        if let Some(season) = self.season {
            pairs.push(("season", season.to_string()));
        }
        if let Some(week) = self.week {
            pairs.push(("week", week.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

/// A standings row. Points come per game or as totals depending on the season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: TeamCode,
    #[serde(default)]
    pub w: u32,
    #[serde(default)]
    pub l: u32,
    #[serde(default)]
    pub t: u32,
    #[serde(default)]
    pub pct: Option<f64>,
    #[serde(default)]
    pub pf_pg: Option<serde_json::Value>,
    #[serde(default)]
    pub pf: Option<serde_json::Value>,
    #[serde(default)]
    pub pa_pg: Option<serde_json::Value>,
    #[serde(default)]
    pub pa: Option<serde_json::Value>,
    #[serde(default)]
    pub division: Option<String>,
}

impl StandingsRow {
    /// Points for: per game, else total.
    pub fn points_for(&self) -> Option<f64> {
        self.pf_pg
            .as_ref()
            .and_then(numeric)
            .or_else(|| self.pf.as_ref().and_then(numeric))
    }

    /// Points against: per game, else total.
    pub fn points_against(&self) -> Option<f64> {
        self.pa_pg
            .as_ref()
            .and_then(numeric)
            .or_else(|| self.pa.as_ref().and_then(numeric))
    }

    /// Parsed division label; unknown labels fall back to the membership table.
    pub fn division(&self) -> Option<Division> {
        self.division
            .as_deref()
            .and_then(|d| d.parse().ok())
            .or_else(|| self.team.division())
    }

    pub fn record(&self) -> WinLossTie {
        WinLossTie {
            wins: self.w,
            losses: self.l,
            ties: self.t,
        }
    }

    /// Reported win percentage, else computed from the record.
    pub fn win_pct(&self) -> Option<f64> {
        self.pct.or_else(|| self.record().win_pct())
    }

    /// Standings as a rankable metric row (`w`, `l`, `pct`, `pf`, `pa`).
    pub fn to_metric_row(&self) -> MetricRow {
        MetricRow::new(self.team.clone())
            .with("w", Some(self.w as f64))
            .with("l", Some(self.l as f64))
            .with("pct", self.win_pct())
            .with("pf", self.points_for())
            .with("pa", self.points_against())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConferenceStandings {
    #[serde(default, rename = "AFC")]
    pub afc: Vec<StandingsRow>,
    #[serde(default, rename = "NFC")]
    pub nfc: Vec<StandingsRow>,
}

impl ConferenceStandings {
    pub fn rows(&self, conference: Conference) -> &[StandingsRow] {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub conferences: ConferenceStandings,
}

/// One team's metrics for a domain, with the number of games behind them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMetricsResponse {
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub games: Option<u32>,
}

impl TeamMetricsResponse {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.metrics.as_ref()?.get(key).and_then(numeric)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueMetricsResponse {
    #[serde(default)]
    pub teams: Vec<MetricRow>,
}
