//! Matchup calculation engine.
//!
//! Pure, synchronous functions over in-memory game lists and metric tables:
//! - Per-side game filtering (venue, opponent scope, last N)
//! - Win/loss and threshold-crossing aggregation
//! - League ranking with deterministic tie-breaks

pub mod aggregate;
pub mod filter;
pub mod rank;

pub use aggregate::{
    aggregate, highlight_ratio, is_highlight, rank_win_loss, win_loss_table, AggregationResult,
    TeamRecord, FG_GAME_LINES, FG_HALF_LINES, GAME_TOTAL_LINES, HALF_TOTAL_LINES, MARGIN_LINES,
};
pub use filter::{
    filter_team_games, head_to_head, sample_notice, season_games, SampleNotice, HEAD_TO_HEAD_LIMIT,
};
pub use rank::{ordinal, rank_metric, rank_team};
