//! # Matchup Trends
//!
//! Side-by-side NFL matchup comparison: filtered win/loss records, league
//! ranks and threshold-crossing trends for two teams.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, teams, filters, metric tables, trend counts)
//! - **schedule**: Merging and de-duplication of schedule batches
//! - **calculate**: Filter engine, aggregation and league ranking
//! - **fetch**: Stats API client
//! - **matchup**: Orchestration and per-pair caching
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod fetch;
pub mod matchup;
pub mod models;
pub mod schedule;

pub use models::*;

/// Season label as shown to users: 2024 becomes "2024/25".
pub fn format_season(season: i32) -> String {
    format!("{}/{:02}", season, (season + 1).rem_euclid(100))
}

/// Parse "2024/25", "2024-25" or "2024" into the starting year.
pub fn parse_season(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (start, end) = match s.split_once(['/', '-']) {
        Some((start, end)) => (start, Some(end)),
        None => (s, None),
    };

    let year: i32 = start.trim().parse().ok()?;
    if let Some(end) = end {
        let end: i32 = end.trim().parse().ok()?;
        if end != (year + 1).rem_euclid(100) && end != year + 1 {
            return None;
        }
    }
    Some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_season() {
        assert_eq!(format_season(2024), "2024/25");
        assert_eq!(format_season(2009), "2009/10");
        assert_eq!(format_season(1999), "1999/00");
    }

    #[test]
    fn test_parse_season_label() {
        assert_eq!(parse_season("2024/25"), Some(2024));
        assert_eq!(parse_season("1999/00"), Some(1999));
    }

    #[test]
    fn test_parse_season_alternatives() {
        assert_eq!(parse_season("2024-25"), Some(2024));
        assert_eq!(parse_season("2024-2025"), Some(2024));
        assert_eq!(parse_season(" 2023 "), Some(2023));
    }

    #[test]
    fn test_parse_season_invalid() {
        assert_eq!(parse_season(""), None);
        assert_eq!(parse_season("abc"), None);
        assert_eq!(parse_season("2024/27"), None);
    }

    #[test]
    fn test_season_round_trip() {
        for season in [2000, 2019, 2025] {
            assert_eq!(parse_season(&format_season(season)), Some(season));
        }
    }
}
