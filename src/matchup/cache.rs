//! Per-pair schedule and trends cache, plus the view generation counter.
//!
//! Entries live for the life of the process. Final games never change, so
//! there is no TTL.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{ExtraFilters, TeamCode, TrendsPayload};
use crate::schedule::MergedSchedule;

/// Unordered team pair: `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(a: &TeamCode, b: &TeamCode) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        PairKey(format!("{}-{}", first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct PairEntry {
    schedule: Option<Arc<MergedSchedule>>,
    trends: HashMap<(TeamCode, ExtraFilters), TrendsPayload>,
}

/// Cache shared by matchup views.
#[derive(Debug, Default)]
pub struct MatchupCache {
    entries: RwLock<HashMap<PairKey, PairEntry>>,
}

impl MatchupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn schedule(&self, key: &PairKey) -> Option<Arc<MergedSchedule>> {
        self.entries
            .read()
            .await
            .get(key)
            .and_then(|e| e.schedule.clone())
    }

    /// Store a merged schedule and hand back the shared copy.
    pub async fn store_schedule(&self, key: &PairKey, schedule: MergedSchedule) -> Arc<MergedSchedule> {
        let schedule = Arc::new(schedule);
        debug!(pair = %key, games = schedule.games.len(), "caching merged schedule");
        self.entries
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .schedule = Some(Arc::clone(&schedule));
        schedule
    }

    pub async fn trends(
        &self,
        key: &PairKey,
        team: &TeamCode,
        filters: &ExtraFilters,
    ) -> Option<TrendsPayload> {
        self.entries
            .read()
            .await
            .get(key)?
            .trends
            .get(&(team.clone(), filters.clone()))
            .cloned()
    }

    pub async fn store_trends(
        &self,
        key: &PairKey,
        team: &TeamCode,
        filters: &ExtraFilters,
        payload: TrendsPayload,
    ) {
        self.entries
            .write()
            .await
            .entry(key.clone())
            .or_default()
            .trends
            .insert((team.clone(), filters.clone()), payload);
    }

    /// Number of cached pairs.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Monotonic counter identifying the latest load of a view.
#[derive(Debug, Default)]
pub struct ViewGeneration {
    current: AtomicU64,
}

impl ViewGeneration {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start a new load; every earlier token becomes stale.
    pub fn begin(self: &Arc<Self>) -> GenerationToken {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationToken {
            id,
            generation: Arc::clone(self),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Handle carried by one load; results are applied only while it is current.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    id: u64,
    generation: Arc<ViewGeneration>,
}

impl GenerationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.generation.current() == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSpec, GameRecord, Venue};

    #[test]
    fn test_pair_key_is_unordered() {
        let kc = TeamCode::new("KC");
        let buf = TeamCode::new("buf");
        assert_eq!(PairKey::new(&kc, &buf), PairKey::new(&buf, &kc));
        assert_eq!(PairKey::new(&kc, &buf).as_str(), "BUF-KC");
    }

    #[tokio::test]
    async fn test_schedule_round_trip() {
        let cache = MatchupCache::new();
        let key = PairKey::new(&TeamCode::new("KC"), &TeamCode::new("BUF"));
        assert!(cache.schedule(&key).await.is_none());

        let merged = MergedSchedule {
            games: vec![GameRecord::new("KC", "BUF", "2024-01-01")],
            batches_ok: 1,
            batches_failed: 0,
        };
        let stored = cache.store_schedule(&key, merged).await;
        let hit = cache.schedule(&key).await.unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_trends_keyed_by_team_and_filters() {
        let cache = MatchupCache::new();
        let kc = TeamCode::new("KC");
        let key = PairKey::new(&kc, &TeamCode::new("BUF"));
        let all = FilterSpec::new().to_wire();
        let home = FilterSpec::new().with_venue(Venue::Home).to_wire();

        let payload = TrendsPayload {
            games: 7,
            ..TrendsPayload::default()
        };
        cache.store_trends(&key, &kc, &all, payload).await;

        assert_eq!(cache.trends(&key, &kc, &all).await.map(|p| p.games), Some(7));
        assert!(cache.trends(&key, &kc, &home).await.is_none());
        assert!(cache.trends(&key, &TeamCode::new("BUF"), &all).await.is_none());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_newer_generation_supersedes() {
        let generation = ViewGeneration::new();
        let first = generation.begin();
        assert!(first.is_current());

        let second = generation.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.id() > first.id());
    }
}
