//! Schedule merging across independently fetched batches.
//!
//! The upstream API does not return all history in one call, so schedules are
//! fetched per season and merged here. Games are immutable once final, so the
//! first occurrence of a game wins.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::{GameKey, GameRecord};

/// Merge batches into one de-duplicated list, keeping first occurrences in input order.
///
/// Records sharing a `game_id` or a date+home+away key, directly or through
/// other records, are one game. The number of games kept does not depend on
/// input order, and re-merging the output is a no-op.
pub fn merge_schedules(batches: &[Vec<GameRecord>]) -> Vec<GameRecord> {
    let games: Vec<&GameRecord> = batches.iter().flatten().collect();

    let mut links = KeyLinks::default();
    let nodes: Vec<usize> = games
        .iter()
        .map(|game| {
            let canonical = links.node(game.key());
            let synthetic = links.node(game.synthetic_key());
            links.union(canonical, synthetic);
            canonical
        })
        .collect();

    let mut kept: HashSet<usize> = HashSet::new();
    let mut merged = Vec::new();
    for (game, node) in games.iter().zip(nodes) {
        if kept.insert(links.find(node)) {
            merged.push((*game).clone());
        }
    }

    if merged.len() < games.len() {
        debug!(kept = merged.len(), dropped = games.len() - merged.len(), "dropped duplicate games");
    }
    merged
}

/// Union-find over game keys.
#[derive(Debug, Default)]
struct KeyLinks {
    index: HashMap<GameKey, usize>,
    parent: Vec<usize>,
}

impl KeyLinks {
    fn node(&mut self, key: GameKey) -> usize {
        let next = self.parent.len();
        let id = *self.index.entry(key).or_insert(next);
        if id == next {
            self.parent.push(next);
        }
        id
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

/// A merged schedule plus the outcome of each batch fetch.
///
/// Zero games with `batches_failed > 0` is a partial result, not an empty history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSchedule {
    pub games: Vec<GameRecord>,
    pub batches_ok: usize,
    pub batches_failed: usize,
}

impl MergedSchedule {
    /// Merge fetch outcomes; failed batches contribute no games.
    pub fn from_batches<E>(results: Vec<Result<Vec<GameRecord>, E>>) -> Self {
        let mut batches = Vec::with_capacity(results.len());
        let mut batches_failed = 0;
        for result in results {
            match result {
                Ok(games) => batches.push(games),
                Err(_) => batches_failed += 1,
            }
        }
        Self {
            games: merge_schedules(&batches),
            batches_ok: batches.len(),
            batches_failed,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.batches_failed > 0
    }

    /// Every batch failed, so the game list says nothing about the teams.
    pub fn is_unavailable(&self) -> bool {
        self.batches_ok == 0 && self.batches_failed > 0
    }
}
