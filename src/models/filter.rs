//! Split filters applied to one side of a matchup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Conference, Division};

/// Venue side relative to the filtered team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "home"),
            Venue::Away => write!(f, "away"),
        }
    }
}

impl FromStr for Venue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Venue::Home),
            "away" => Ok(Venue::Away),
            other => Err(format!("unknown venue: {}", other)),
        }
    }
}

/// How to narrow a team's game list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Keep only the N most recent finished games; 0 means no limit
    pub last_n: Option<usize>,

    pub venue: Option<Venue>,

    /// Ignored when `opponent_division` is set
    pub opponent_conference: Option<Conference>,

    pub opponent_division: Option<Division>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_n(mut self, n: usize) -> Self {
        self.last_n = Some(n);
        self
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = Some(venue);
        self
    }

    pub fn with_opponent_conference(mut self, conference: Conference) -> Self {
        self.opponent_conference = Some(conference);
        self
    }

    pub fn with_opponent_division(mut self, division: Division) -> Self {
        self.opponent_division = Some(division);
        self
    }

    /// The last-N window in effect; 0 means no limit.
    pub fn limit(&self) -> Option<usize> {
        self.last_n.filter(|n| *n > 0)
    }

    /// The opponent restriction that actually applies (division wins).
    pub fn opponent(&self) -> OpponentScope {
        match (self.opponent_division, self.opponent_conference) {
            (Some(division), _) => OpponentScope::Division(division),
            (None, Some(conference)) => OpponentScope::Conference(conference),
            (None, None) => OpponentScope::Any,
        }
    }

    /// Query-parameter form sent to the stats API.
    pub fn to_wire(&self) -> ExtraFilters {
        let (opponent_conf, opponent_div) = match self.opponent() {
            OpponentScope::Division(d) => (None, Some(d.to_string())),
            OpponentScope::Conference(c) => (Some(c.to_string()), None),
            OpponentScope::Any => (None, None),
        };
        ExtraFilters {
            last_n: self.limit(),
            venue: self.venue,
            opponent_conf,
            opponent_div,
        }
    }
}

/// Effective opponent restriction of a [`FilterSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentScope {
    Any,
    Conference(Conference),
    Division(Division),
}

/// Wire form of [`FilterSpec`]: `{ last_n?, venue?, opponent_conf?, opponent_div? }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtraFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_n: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_conf: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_div: Option<String>,
}

impl ExtraFilters {
    /// Flatten into query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(n) = self.last_n {
            pairs.push(("last_n", n.to_string()));
        }
        if let Some(venue) = self.venue {
            pairs.push(("venue", venue.to_string()));
        }
        if let Some(conf) = &self.opponent_conf {
            pairs.push(("opponent_conf", conf.clone()));
        }
        if let Some(div) = &self.opponent_div {
            pairs.push(("opponent_div", div.clone()));
        }
        pairs
    }
}
