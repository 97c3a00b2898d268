//! Display-ready comparison tables.

use serde::Serialize;
use std::fmt;

use crate::calculate::{is_highlight, ordinal, SampleNotice};
use crate::models::{FilterSpec, GameRecord, TeamCode};

/// Rendered in place of any absent value or rank.
pub const PLACEHOLDER: &str = "—";

/// One side's value and league rank for a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatCell {
    pub value: Option<f64>,
    pub rank: Option<usize>,
}

impl StatCell {
    pub fn new(value: Option<f64>, rank: Option<usize>) -> Self {
        Self { value, rank }
    }

    /// Value with one decimal, integers as-is.
    pub fn display_value(&self) -> String {
        match self.value {
            Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
            Some(v) => format!("{:.1}", v),
            None => PLACEHOLDER.to_string(),
        }
    }

    pub fn display_rank(&self) -> String {
        self.rank.map(ordinal).unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// A metric compared across both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub label: &'static str,
    pub key: &'static str,
    pub smaller_is_better: bool,
    pub away: StatCell,
    pub home: StatCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSection {
    pub title: &'static str,
    pub rows: Vec<StatRow>,
}

/// Per-side context shown above the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSummary {
    pub team: TeamCode,
    pub filter: FilterSpec,

    /// Filtered games behind the numbers, when known
    pub games: Option<usize>,

    #[serde(skip)]
    pub notice: SampleNotice,
}

/// Offense / defense / special-teams comparison of two teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsComparison {
    pub away: SideSummary,
    pub home: SideSummary,
    pub sections: Vec<StatSection>,

    /// Fetches that failed and were replaced by placeholders
    pub failed_fetches: usize,
}

impl StatsComparison {
    pub fn section(&self, title: &str) -> Option<&StatSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// A count out of the games it was taken over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendCell {
    pub count: u32,
    pub games: u32,
}

impl TrendCell {
    pub fn new(count: u32, games: u32) -> Self {
        Self { count, games }
    }

    pub fn is_highlight(&self) -> bool {
        is_highlight(self.count, self.games)
    }
}

impl fmt::Display for TrendCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_highlight() {
            write!(f, "*{}*", self.count)
        } else {
            write!(f, "{}", self.count)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub label: String,
    pub away: Option<TrendCell>,
    pub home: Option<TrendCell>,

    /// Whether cells of this row may be emphasized ("played" rows never are)
    pub highlightable: bool,
}

impl TrendRow {
    pub fn display_cell(&self, cell: Option<TrendCell>) -> String {
        match cell {
            Some(c) if self.highlightable => c.to_string(),
            Some(c) => c.count.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSection {
    pub title: &'static str,
    pub rows: Vec<TrendRow>,
}

/// Where a side's counts for a section came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountSource {
    /// Aggregated from the merged schedule
    Local,
    /// Taken from the backend trends payload
    Backend,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSide {
    pub team: TeamCode,
    pub filter: FilterSpec,
    pub games_used: u32,
    pub full_game: CountSource,
    pub halves: CountSource,
    pub field_goals: CountSource,

    #[serde(skip)]
    pub notice: SampleNotice,
}

/// Threshold-crossing comparison of two teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsComparison {
    pub away: TrendSide,
    pub home: TrendSide,
    pub sections: Vec<TrendSection>,

    /// Finished meetings of the pair, newest first
    pub head_to_head: Vec<GameRecord>,

    /// Some history batches failed to load
    pub schedule_partial: bool,
}

impl TrendsComparison {
    pub fn section(&self, title: &str) -> Option<&TrendSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}
