//! League ranking over per-team metric tables.

use std::cmp::Ordering;

use crate::models::{MetricDef, MetricRow, TeamCode};

/// 1-based rank of `team` on `metric_key`, or None when the team is not in the table.
///
/// Missing values rank worst. Equal values are ordered by team code so the
/// result does not depend on the table's order.
pub fn rank_team(
    table: &[MetricRow],
    team: &TeamCode,
    metric_key: &str,
    smaller_is_better: bool,
) -> Option<usize> {
    let worst = if smaller_is_better {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    };

    let mut keyed: Vec<(f64, &TeamCode)> = table
        .iter()
        .map(|row| (row.get(metric_key).unwrap_or(worst), &row.team))
        .collect();

    keyed.sort_by(|(va, ta), (vb, tb)| {
        let by_value = if smaller_is_better {
            va.total_cmp(vb)
        } else {
            vb.total_cmp(va)
        };
        match by_value {
            Ordering::Equal => ta.cmp(tb),
            other => other,
        }
    });

    keyed.iter().position(|(_, t)| *t == team).map(|i| i + 1)
}

/// Rank on a catalog metric, using its ranking key and direction.
pub fn rank_metric(table: &[MetricRow], team: &TeamCode, def: &MetricDef) -> Option<usize> {
    rank_team(table, team, def.ranking_key(), def.smaller_is_better)
}

/// "3rd", "11th", "22nd".
pub fn ordinal(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", rank, suffix)
}
