//! Core data models for matchup comparisons.

mod api;
mod filter;
mod game;
mod metrics;
mod team;
mod trends;

pub use api::*;
pub use filter::*;
pub use game::*;
pub use metrics::*;
pub use team::*;
pub use trends::*;
