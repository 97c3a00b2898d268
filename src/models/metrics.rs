//! League metric tables and the metric catalog used for comparison rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::TeamCode;

/// Which stats endpoint a metric comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDomain {
    Offense,
    Defense,
    SpecialTeams,
}

impl MetricDomain {
    pub fn all() -> [MetricDomain; 3] {
        [
            MetricDomain::Offense,
            MetricDomain::Defense,
            MetricDomain::SpecialTeams,
        ]
    }

    /// URL path segment used by the stats API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MetricDomain::Offense => "offense",
            MetricDomain::Defense => "defense",
            MetricDomain::SpecialTeams => "st",
        }
    }
}

impl fmt::Display for MetricDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricDomain::Offense => write!(f, "offense"),
            MetricDomain::Defense => write!(f, "defense"),
            MetricDomain::SpecialTeams => write!(f, "special teams"),
        }
    }
}

impl std::str::FromStr for MetricDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offense" | "off" => Ok(MetricDomain::Offense),
            "defense" | "def" => Ok(MetricDomain::Defense),
            "st" | "special_teams" | "special-teams" => Ok(MetricDomain::SpecialTeams),
            other => Err(format!("unknown metric domain: {}", other)),
        }
    }
}

/// Read a JSON value as a number. Null, non-numeric and NaN are absent.
pub fn numeric(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if n.is_nan() {
        None
    } else {
        Some(n)
    }
}

/// One team's row in a league-wide metric table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub team: TeamCode,

    #[serde(flatten)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl MetricRow {
    pub fn new(team: impl Into<TeamCode>) -> Self {
        Self {
            team: team.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder method to set a numeric value (None stores null).
    pub fn with(mut self, key: &str, value: Option<f64>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: Option<f64>) {
        let json = value
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
        self.values.insert(key.to_string(), json);
    }

    /// Numeric value for a key, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(numeric)
    }

    /// First present value along the metric's fallback chain.
    pub fn resolve(&self, def: &MetricDef) -> Option<f64> {
        std::iter::once(def.key)
            .chain(def.fallbacks.iter().copied())
            .find_map(|k| self.get(k))
    }
}

/// A comparison metric: where its value lives and how it ranks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDef {
    /// Display label
    pub label: &'static str,

    /// Canonical value key
    pub key: &'static str,

    /// Keys tried in order when `key` is absent (e.g. total when per-game is missing)
    pub fallbacks: &'static [&'static str],

    /// Key used for ranking, when it differs from `key`
    pub rank_key: Option<&'static str>,

    pub domain: MetricDomain,

    pub smaller_is_better: bool,
}

impl MetricDef {
    const fn new(label: &'static str, key: &'static str, domain: MetricDomain) -> Self {
        Self {
            label,
            key,
            fallbacks: &[],
            rank_key: None,
            domain,
            smaller_is_better: false,
        }
    }

    const fn fallback(mut self, keys: &'static [&'static str]) -> Self {
        self.fallbacks = keys;
        self
    }

    const fn ranked_by(mut self, key: &'static str) -> Self {
        self.rank_key = Some(key);
        self
    }

    const fn lower_is_better(mut self) -> Self {
        self.smaller_is_better = true;
        self
    }

    /// Key the ranking engine sorts on.
    pub fn ranking_key(&self) -> &'static str {
        self.rank_key.unwrap_or(self.key)
    }
}

use MetricDomain::{Defense, Offense, SpecialTeams};

pub const OFFENSE_METRICS: &[MetricDef] = &[
    MetricDef::new("PTS/G", "pf_pg", Offense).fallback(&["pf"]),
    MetricDef::new("PASS YDS/G", "pyds_pg", Offense),
    MetricDef::new("RUSH YDS/G", "ruyds_pg", Offense),
    MetricDef::new("TD TOT", "td_total", Offense).fallback(&["td"]),
    MetricDef::new("PASS TD/G", "pass_td_pg", Offense),
    MetricDef::new("RUSH TD/G", "rush_td_pg", Offense),
    MetricDef::new("YDS/PLAY", "ypp", Offense),
    MetricDef::new("3RD DOWN %", "third_pct", Offense),
    MetricDef::new("4TH DOWN %", "fourth_pct", Offense),
    MetricDef::new("RZ TD %", "rz_td_pct", Offense),
    MetricDef::new("EXPLOSIVE/G", "explosive_pg", Offense),
    MetricDef::new("TURNOVERS/G", "to_pg", Offense).lower_is_better(),
];

pub const DEFENSE_METRICS: &[MetricDef] = &[
    MetricDef::new("PTS ALLOWED/G", "pa_pg", Defense)
        .fallback(&["pa"])
        .lower_is_better(),
    MetricDef::new("PASS YDS ALLOWED/G", "pyds_allowed_pg", Defense).lower_is_better(),
    MetricDef::new("RUSH YDS ALLOWED/G", "ruyds_allowed_pg", Defense).lower_is_better(),
    MetricDef::new("TD ALLOWED", "td_allowed_total", Defense)
        .fallback(&["td_allowed"])
        .ranked_by("td_allowed")
        .lower_is_better(),
    MetricDef::new("PASS TD ALLOWED/G", "pass_td_allowed_pg", Defense).lower_is_better(),
    MetricDef::new("RUSH TD ALLOWED/G", "rush_td_allowed_pg", Defense).lower_is_better(),
    MetricDef::new("YDS/PLAY ALLOWED", "yppa", Defense).lower_is_better(),
    MetricDef::new("SACKS/G", "sacks_pg", Defense),
    MetricDef::new("TAKEAWAYS/G", "takeaways_pg", Defense),
];

pub const SPECIAL_TEAMS_METRICS: &[MetricDef] = &[
    MetricDef::new("FG %", "fg_pct", SpecialTeams),
    MetricDef::new("FG MADE/G", "fg_made_pg", SpecialTeams),
    MetricDef::new("FG ATT/G", "fg_att_pg", SpecialTeams),
    MetricDef::new("XP %", "xp_pct", SpecialTeams),
    MetricDef::new("XP ATT/G", "xp_att_pg", SpecialTeams),
    MetricDef::new("PUNTS/G", "punts_pg", SpecialTeams).lower_is_better(),
];

/// Catalog for one domain.
pub fn metrics_for(domain: MetricDomain) -> &'static [MetricDef] {
    match domain {
        MetricDomain::Offense => OFFENSE_METRICS,
        MetricDomain::Defense => DEFENSE_METRICS,
        MetricDomain::SpecialTeams => SPECIAL_TEAMS_METRICS,
    }
}

/// Find a metric by key or ranking key across all domains.
pub fn find_metric(key: &str) -> Option<&'static MetricDef> {
    MetricDomain::all()
        .into_iter()
        .flat_map(metrics_for)
        .find(|d| d.key == key || d.ranking_key() == key)
}

/// Resolve fallback chains once, writing canonical keys into every row.
///
/// Rows already holding a canonical value are left as they are.
pub fn normalize_table(rows: &[MetricRow], defs: &[MetricDef]) -> Vec<MetricRow> {
    rows.iter()
        .map(|row| {
            let mut out = row.clone();
            for def in defs {
                if out.get(def.key).is_none() {
                    out.set(def.key, row.resolve(def));
                }
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_row_flattened_deserialize() {
        let row: MetricRow =
            serde_json::from_value(json!({"team": "kc", "pf_pg": 24.5, "to_pg": null})).unwrap();
        assert_eq!(row.team.as_str(), "KC");
        assert_eq!(row.get("pf_pg"), Some(24.5));
        assert_eq!(row.get("to_pg"), None);
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_numeric_accepts_strings_rejects_garbage() {
        assert_eq!(numeric(&json!("3.5")), Some(3.5));
        assert_eq!(numeric(&json!("n/a")), None);
        assert_eq!(numeric(&json!(true)), None);
        assert_eq!(numeric(&json!(7)), Some(7.0));
    }

    #[test]
    fn test_fallback_chain() {
        let def = OFFENSE_METRICS[0];
        let per_game = MetricRow::new("KC").with("pf_pg", Some(25.0)).with("pf", Some(400.0));
        let total_only = MetricRow::new("BUF").with("pf", Some(410.0));
        let neither = MetricRow::new("NE");

        assert_eq!(per_game.resolve(&def), Some(25.0));
        assert_eq!(total_only.resolve(&def), Some(410.0));
        assert_eq!(neither.resolve(&def), None);
    }

    #[test]
    fn test_normalize_table_fills_canonical_keys() {
        let rows = vec![
            MetricRow::new("KC").with("pa", Some(300.0)),
            MetricRow::new("BUF").with("pa_pg", Some(18.0)),
        ];
        let normalized = normalize_table(&rows, DEFENSE_METRICS);
        assert_eq!(normalized[0].get("pa_pg"), Some(300.0));
        assert_eq!(normalized[1].get("pa_pg"), Some(18.0));
        // input untouched
        assert_eq!(rows[0].get("pa_pg"), None);
    }

    #[test]
    fn test_rank_key_override() {
        let def = find_metric("td_allowed_total").unwrap();
        assert_eq!(def.ranking_key(), "td_allowed");
        assert!(def.smaller_is_better);
        assert_eq!(find_metric("td_allowed").map(|d| d.key), Some("td_allowed_total"));
    }

    #[test]
    fn test_domain_parse_and_path() {
        assert_eq!("st".parse::<MetricDomain>(), Ok(MetricDomain::SpecialTeams));
        assert_eq!(MetricDomain::Defense.path_segment(), "defense");
        assert!("kicking".parse::<MetricDomain>().is_err());
    }
}
