//! Matchup orchestrator.
//!
//! Coordinates one comparison view:
//! 1. Fan out fetches for both sides concurrently
//! 2. Keep whatever succeeded, log and placeholder the rest
//! 3. Filter, aggregate and rank locally
//! 4. Drop the result if a newer load of the same view started meanwhile

pub mod cache;
pub mod view;

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calculate::{
    aggregate, filter_team_games, head_to_head, rank_team, rank_win_loss, sample_notice,
    season_games, win_loss_table, SampleNotice, TeamRecord, FG_GAME_LINES, FG_HALF_LINES, GAME_TOTAL_LINES,
    HALF_TOTAL_LINES, MARGIN_LINES,
};
use crate::config::MatchupConfig;
use crate::fetch::{FetchError, StatsSource};
use crate::models::{
    find_metric, league_teams, metrics_for, normalize_table, Conference, ExtraFilters, FilterSpec,
    GameRecord, LeagueMetricsResponse, MetricDomain, MetricRow, OverUnder, ScheduleQuery, StatScope, TeamCode, TeamMetricsResponse, TrendCounts,
    TrendsPayload, WinLossTie,
};
use crate::schedule::MergedSchedule;

pub use cache::{GenerationToken, MatchupCache, PairKey, ViewGeneration};
pub use view::{
    CountSource, SideSummary, StatCell, StatRow, StatSection, StatsComparison, TrendCell,
    TrendRow, TrendSection, TrendSide, TrendsComparison, PLACEHOLDER,
};

pub const SECTION_RECORD: &str = "Record";
pub const SECTION_FULL_GAME: &str = "Full game";
pub const SECTION_FIRST_HALF: &str = "1st half";
pub const SECTION_SECOND_HALF: &str = "2nd half";
pub const SECTION_MARGIN: &str = "Margin";

fn domain_title(domain: MetricDomain) -> &'static str {
    match domain {
        MetricDomain::Offense => "Offense",
        MetricDomain::Defense => "Defense",
        MetricDomain::SpecialTeams => "Special teams",
    }
}

/// Two teams and the filter applied to each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupSelection {
    pub away: TeamCode,
    pub home: TeamCode,
    pub away_filter: FilterSpec,
    pub home_filter: FilterSpec,
}

impl MatchupSelection {
    pub fn new(away: impl Into<TeamCode>, home: impl Into<TeamCode>) -> Self {
        Self {
            away: away.into(),
            home: home.into(),
            away_filter: FilterSpec::default(),
            home_filter: FilterSpec::default(),
        }
    }

    /// Builder method to set both side filters.
    pub fn with_filters(mut self, away: FilterSpec, home: FilterSpec) -> Self {
        self.away_filter = away;
        self.home_filter = home;
        self
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.away, &self.home)
    }
}

/// One team's position in a league table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueRank {
    pub team: TeamCode,
    pub metric: String,
    pub value: Option<f64>,
    pub rank: Option<usize>,
    pub table_size: usize,
}

/// A standings row with its W/L rank inside the conference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsLine {
    pub team: TeamCode,
    pub record: WinLossTie,
    pub pct: Option<f64>,
    pub points_for: Option<f64>,
    pub points_against: Option<f64>,
    pub division: Option<String>,
    pub conference_rank: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandingsView {
    pub season: i32,
    pub conferences: BTreeMap<String, Vec<StandingsLine>>,
}

/// Log a failed fetch and continue without it.
fn settle<T>(what: &str, result: Result<T, FetchError>, failures: &mut usize) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed: {}", what, e);
            *failures += 1;
            None
        }
    }
}

/// Loads comparison views from a [`StatsSource`], caching per team pair.
pub struct MatchupOrchestrator {
    source: Arc<dyn StatsSource>,
    cache: Arc<MatchupCache>,
    config: MatchupConfig,
    stats_generation: Arc<ViewGeneration>,
    trends_generation: Arc<ViewGeneration>,
}

impl MatchupOrchestrator {
    pub fn new(source: Arc<dyn StatsSource>, cache: Arc<MatchupCache>, config: MatchupConfig) -> Self {
        Self {
            source,
            cache,
            config,
            stats_generation: ViewGeneration::new(),
            trends_generation: ViewGeneration::new(),
        }
    }

    pub fn config(&self) -> &MatchupConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<MatchupCache> {
        &self.cache
    }

    /// Load the stats comparison. None when a newer stats load superseded this one.
    pub async fn load_stats(&self, selection: &MatchupSelection) -> Option<StatsComparison> {
        let token = self.stats_generation.begin();
        let comparison = self.build_stats(selection).await;
        self.keep_if_current(&token, "stats", comparison)
    }

    /// Load the trends comparison. None when a newer trends load superseded this one.
    pub async fn load_trends(&self, selection: &MatchupSelection) -> Option<TrendsComparison> {
        let token = self.trends_generation.begin();
        let comparison = self.build_trends(selection).await;
        self.keep_if_current(&token, "trends", comparison)
    }

    fn keep_if_current<T>(&self, token: &GenerationToken, view: &str, value: T) -> Option<T> {
        if token.is_current() {
            Some(value)
        } else {
            debug!(generation = token.id(), "discarding stale {} result", view);
            None
        }
    }

    async fn build_stats(&self, selection: &MatchupSelection) -> StatsComparison {
        let scope = self.config.scope();
        let away_wire = selection.away_filter.to_wire();
        let home_wire = selection.home_filter.to_wire();
        let season_query = ScheduleQuery::season_window(self.config.season);

        info!(
            source = self.source.name(),
            away = %selection.away,
            home = %selection.home,
            "Loading stats comparison"
        );

        let (away_metrics, home_metrics, away_tables, home_tables, schedule) = tokio::join!(
            self.team_metrics_all(&selection.away, &scope, &away_wire),
            self.team_metrics_all(&selection.home, &scope, &home_wire),
            self.league_tables(&scope, &away_wire),
            self.league_tables(&scope, &home_wire),
            self.source.schedule(&season_query),
        );

        let mut failures = 0;
        let schedule = settle("season schedule", schedule, &mut failures)
            .map(|s| season_games(&s.games, self.config.season));

        let mut away_metrics = away_metrics.into_iter();
        let mut home_metrics = home_metrics.into_iter();
        let mut away_tables = away_tables.into_iter();
        let mut home_tables = home_tables.into_iter();

        let mut sections = vec![self.record_section(selection, schedule.as_deref())];
        let mut away_games = None;
        let mut home_games = None;

        for domain in MetricDomain::all() {
            let defs = metrics_for(domain);
            let away_resp = away_metrics
                .next()
                .and_then(|r| settle(&format!("{} {}", selection.away, domain), r, &mut failures));
            let home_resp = home_metrics
                .next()
                .and_then(|r| settle(&format!("{} {}", selection.home, domain), r, &mut failures));
            let away_table = away_tables
                .next()
                .and_then(|r| settle(&format!("league {} (away filters)", domain), r, &mut failures))
                .map(|t| normalize_table(&t.teams, defs));
            let home_table = home_tables
                .next()
                .and_then(|r| settle(&format!("league {} (home filters)", domain), r, &mut failures))
                .map(|t| normalize_table(&t.teams, defs));

            if domain == MetricDomain::Offense {
                away_games = away_resp.as_ref().and_then(|r| r.games);
                home_games = home_resp.as_ref().and_then(|r| r.games);
            }

            let rows = defs
                .iter()
                .map(|def| StatRow {
                    label: def.label,
                    key: def.key,
                    smaller_is_better: def.smaller_is_better,
                    away: stat_cell(away_resp.as_ref(), away_table.as_deref(), &selection.away, def),
                    home: stat_cell(home_resp.as_ref(), home_table.as_deref(), &selection.home, def),
                })
                .collect();
            sections.push(StatSection {
                title: domain_title(domain),
                rows,
            });
        }

        let away = side_summary(&selection.away, &selection.away_filter, schedule.as_deref(), away_games);
        let home = side_summary(&selection.home, &selection.home_filter, schedule.as_deref(), home_games);

        if failures > 0 {
            warn!(failures, "stats comparison loaded with placeholders");
        }

        StatsComparison {
            away,
            home,
            sections,
            failed_fetches: failures,
        }
    }

    async fn team_metrics_all(
        &self,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Vec<Result<TeamMetricsResponse, FetchError>> {
        join_all(
            MetricDomain::all()
                .into_iter()
                .map(|domain| self.source.team_metrics(domain, team, scope, filters)),
        )
        .await
    }

    async fn league_tables(
        &self,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Vec<Result<LeagueMetricsResponse, FetchError>> {
        join_all(
            MetricDomain::all()
                .into_iter()
                .map(|domain| self.source.league_metrics(domain, scope, filters)),
        )
        .await
    }

    /// Won/lost rows from the current-season schedule, ranked league-wide per side filter.
    fn record_section(&self, selection: &MatchupSelection, schedule: Option<&[GameRecord]>) -> StatSection {
        let teams = league_teams();
        let side = |team: &TeamCode, filter: &FilterSpec| -> (Option<WinLossTie>, Option<usize>) {
            let Some(games) = schedule else {
                return (None, None);
            };
            let table = win_loss_table(games, &teams, filter);
            let own = table
                .iter()
                .find(|r| r.team == *team)
                .map(|r| r.record)
                .unwrap_or_else(|| record_of(games, team, filter));
            let mut ranked = table;
            if !ranked.iter().any(|r| r.team == *team) {
                ranked.push(TeamRecord {
                    team: team.clone(),
                    record: own,
                });
            }
            (Some(own), rank_win_loss(&ranked, team))
        };

        let (away_rec, away_rank) = side(&selection.away, &selection.away_filter);
        let (home_rec, home_rank) = side(&selection.home, &selection.home_filter);

        let row = |label, key, smaller_is_better, pick: fn(&WinLossTie) -> u32| StatRow {
            label,
            key,
            smaller_is_better,
            away: StatCell::new(away_rec.as_ref().map(|r| pick(r) as f64), away_rank),
            home: StatCell::new(home_rec.as_ref().map(|r| pick(r) as f64), home_rank),
        };

        StatSection {
            title: SECTION_RECORD,
            rows: vec![
                row("Won", "w", false, |r| r.wins),
                row("Lost", "l", true, |r| r.losses),
            ],
        }
    }

    async fn build_trends(&self, selection: &MatchupSelection) -> TrendsComparison {
        let key = selection.pair_key();
        let scope = self.config.scope();
        let away_wire = selection.away_filter.to_wire();
        let home_wire = selection.home_filter.to_wire();

        info!(source = self.source.name(), pair = %key, "Loading trends comparison");

        let (schedule, away_payload, home_payload) = tokio::join!(
            self.pair_schedule(&key),
            self.side_trends(&key, &selection.away, &scope, &away_wire),
            self.side_trends(&key, &selection.home, &scope, &home_wire),
        );

        // counts cover the configured season, head-to-head the whole history
        let season = season_games(&schedule.games, self.config.season);
        let away = SideCounts::build(
            &schedule,
            &season,
            &selection.away,
            &selection.away_filter,
            away_payload.as_ref(),
        );
        let home = SideCounts::build(
            &schedule,
            &season,
            &selection.home,
            &selection.home_filter,
            home_payload.as_ref(),
        );

        let sections = vec![
            full_game_section(&away, &home),
            half_section(SECTION_FIRST_HALF, &away, &home, |c| (&c.h1, c.wl.h1, &c.fg.h1)),
            half_section(SECTION_SECOND_HALF, &away, &home, |c| (&c.h2, c.wl.h2, &c.fg.h2)),
            margin_section(&away, &home),
        ];

        TrendsComparison {
            away: away.side(&selection.away, &selection.away_filter),
            home: home.side(&selection.home, &selection.home_filter),
            sections,
            head_to_head: head_to_head(&schedule.games, &selection.away, &selection.home),
            schedule_partial: schedule.is_partial(),
        }
    }

    /// Merged multi-season history for a pair, from cache or one fetch per season.
    async fn pair_schedule(&self, key: &PairKey) -> Arc<MergedSchedule> {
        if let Some(cached) = self.cache.schedule(key).await {
            debug!(pair = %key, "schedule cache hit");
            return cached;
        }

        let seasons: Vec<i32> = self.config.history_seasons().collect();
        let results = join_all(seasons.iter().map(|season| async move {
            self.source
                .schedule(&ScheduleQuery::season(*season))
                .await
                .map(|r| r.games)
                .map_err(|e| {
                    warn!("schedule for season {} failed: {}", season, e);
                    e
                })
        }))
        .await;

        let merged = MergedSchedule::from_batches(results);
        info!(
            pair = %key,
            games = merged.games.len(),
            failed = merged.batches_failed,
            "Merged {} schedule batches",
            seasons.len()
        );

        // incomplete history is retried on the next load
        if merged.is_partial() {
            Arc::new(merged)
        } else {
            self.cache.store_schedule(key, merged).await
        }
    }

    async fn side_trends(
        &self,
        key: &PairKey,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Option<TrendsPayload> {
        if let Some(cached) = self.cache.trends(key, team, filters).await {
            debug!(%team, "trends cache hit");
            return Some(cached);
        }
        match self.source.team_trends(team, scope, filters).await {
            Ok(payload) => {
                self.cache.store_trends(key, team, filters, payload.clone()).await;
                Some(payload)
            }
            Err(e) => {
                warn!("trends for {} failed: {}", team, e);
                None
            }
        }
    }

    /// League standings with each team's W/L rank inside its conference.
    pub async fn load_standings(&self) -> Result<StandingsView, FetchError> {
        let season = self.config.season;
        let response = self.source.standings(season).await?;

        let mut conferences = BTreeMap::new();
        for conference in [Conference::Afc, Conference::Nfc] {
            let rows = response.conferences.rows(conference);
            let records: Vec<TeamRecord> = rows
                .iter()
                .map(|r| TeamRecord {
                    team: r.team.clone(),
                    record: r.record(),
                })
                .collect();

            let mut lines: Vec<StandingsLine> = rows
                .iter()
                .zip(&records)
                .map(|(row, rec)| StandingsLine {
                    team: row.team.clone(),
                    record: rec.record,
                    pct: row.win_pct(),
                    points_for: row.points_for(),
                    points_against: row.points_against(),
                    division: row.division().map(|d| d.to_string()),
                    conference_rank: rank_win_loss(&records, &row.team),
                })
                .collect();
            lines.sort_by_key(|l| l.conference_rank.unwrap_or(usize::MAX));
            conferences.insert(conference.to_string(), lines);
        }

        Ok(StandingsView {
            season: response.season.unwrap_or(season),
            conferences,
        })
    }

    /// Rank one team on a league metric table.
    ///
    /// Catalog metrics use their ranking key and direction; other keys rank
    /// higher-is-better. Standings keys (`w`, `l`, `pct`, `pf`, `pa`) rank
    /// against the standings table.
    pub async fn league_rank(
        &self,
        domain: MetricDomain,
        metric: &str,
        team: &TeamCode,
        filter: &FilterSpec,
    ) -> Result<LeagueRank, FetchError> {
        let scope = self.config.scope();
        let (table, key, smaller_is_better) = match find_metric(metric) {
            Some(def) => {
                let response = self.source.league_metrics(def.domain, &scope, &filter.to_wire()).await?;
                (
                    normalize_table(&response.teams, metrics_for(def.domain)),
                    def.ranking_key(),
                    def.smaller_is_better,
                )
            }
            None if matches!(metric, "w" | "l" | "pct" | "pf" | "pa") => {
                let response = self.source.standings(self.config.season).await?;
                let table: Vec<MetricRow> = [Conference::Afc, Conference::Nfc]
                    .into_iter()
                    .flat_map(|c| response.conferences.rows(c).to_vec())
                    .map(|r| r.to_metric_row())
                    .collect();
                (table, metric, matches!(metric, "l" | "pa"))
            }
            None => {
                let response = self.source.league_metrics(domain, &scope, &filter.to_wire()).await?;
                (response.teams, metric, false)
            }
        };

        let value = table.iter().find(|r| r.team == *team).and_then(|r| r.get(key));
        Ok(LeagueRank {
            team: team.clone(),
            metric: key.to_string(),
            value,
            rank: rank_team(&table, team, key, smaller_is_better),
            table_size: table.len(),
        })
    }
}

/// Team value along the metric's fallback chain, ranked in the normalized table.
fn stat_cell(
    response: Option<&TeamMetricsResponse>,
    table: Option<&[MetricRow]>,
    team: &TeamCode,
    def: &crate::models::MetricDef,
) -> StatCell {
    let value = response.and_then(|r| {
        std::iter::once(def.key)
            .chain(def.fallbacks.iter().copied())
            .find_map(|k| r.get(k))
    });
    let rank = table.and_then(|t| crate::calculate::rank_metric(t, team, def));
    StatCell::new(value, rank)
}

fn record_of(games: &[GameRecord], team: &TeamCode, filter: &FilterSpec) -> WinLossTie {
    let mut record = WinLossTie::default();
    for game in filter_team_games(games, team, filter) {
        if let Some((own, opp)) = game.score_for(team) {
            record.record(own, opp);
        }
    }
    record
}

fn side_summary(
    team: &TeamCode,
    filter: &FilterSpec,
    schedule: Option<&[GameRecord]>,
    reported_games: Option<u32>,
) -> SideSummary {
    let games = match schedule {
        Some(games) => Some(filter_team_games(games, team, filter).len()),
        None => reported_games.map(|g| g as usize),
    };
    SideSummary {
        team: team.clone(),
        filter: filter.clone(),
        games,
        notice: games
            .map(|g| sample_notice(g, filter))
            .unwrap_or(SampleNotice::Sufficient),
    }
}

/// One side's counts and where each part came from.
#[derive(Debug, Clone)]
struct SideCounts {
    counts: TrendCounts,
    games: u32,
    half_games: u32,
    fg_games: u32,
    full_game: CountSource,
    halves: CountSource,
    field_goals: CountSource,
    notice: SampleNotice,
}

impl SideCounts {
    /// Local aggregation over the season's games, backend payload for what they lack.
    fn build(
        schedule: &MergedSchedule,
        season: &[GameRecord],
        team: &TeamCode,
        filter: &FilterSpec,
        payload: Option<&TrendsPayload>,
    ) -> Self {
        if schedule.is_unavailable() {
            return match payload {
                Some(p) => SideCounts {
                    counts: p.counts.clone(),
                    games: p.games,
                    half_games: p.games,
                    fg_games: p.games,
                    full_game: CountSource::Backend,
                    halves: CountSource::Backend,
                    field_goals: CountSource::Backend,
                    notice: sample_notice(p.games as usize, filter),
                },
                None => SideCounts {
                    counts: TrendCounts::default(),
                    games: 0,
                    half_games: 0,
                    fg_games: 0,
                    full_game: CountSource::Unavailable,
                    halves: CountSource::Unavailable,
                    field_goals: CountSource::Unavailable,
                    notice: SampleNotice::Empty,
                },
            };
        }

        let filtered = filter_team_games(season, team, filter);
        let local = aggregate(&filtered, team);
        let mut side = SideCounts {
            notice: sample_notice(filtered.len(), filter),
            games: local.games_used,
            half_games: local.half_games_used,
            fg_games: local.fg_games_used,
            full_game: CountSource::Local,
            halves: CountSource::Local,
            field_goals: CountSource::Local,
            counts: local.counts,
        };

        if local.half_games_used == 0 {
            match payload {
                Some(p) => {
                    side.counts.h1 = p.counts.h1.clone();
                    side.counts.h2 = p.counts.h2.clone();
                    side.counts.wl.h1 = p.counts.wl.h1;
                    side.counts.wl.h2 = p.counts.wl.h2;
                    side.half_games = p.games;
                    side.halves = CountSource::Backend;
                }
                None => side.halves = CountSource::Unavailable,
            }
        }

        if local.fg_games_used == 0 {
            match payload {
                Some(p) => {
                    side.counts.fg = p.counts.fg.clone();
                    side.fg_games = p.games;
                    side.field_goals = CountSource::Backend;
                }
                None => side.field_goals = CountSource::Unavailable,
            }
        }

        side
    }

    fn cell(source: CountSource, count: u32, games: u32) -> Option<TrendCell> {
        match source {
            CountSource::Unavailable => None,
            _ => Some(TrendCell::new(count, games)),
        }
    }

    fn full(&self, count: u32) -> Option<TrendCell> {
        Self::cell(self.full_game, count, self.games)
    }

    fn half(&self, count: u32) -> Option<TrendCell> {
        Self::cell(self.halves, count, self.half_games)
    }

    fn fg(&self, count: u32) -> Option<TrendCell> {
        Self::cell(self.field_goals, count, self.fg_games)
    }

    fn side(&self, team: &TeamCode, filter: &FilterSpec) -> TrendSide {
        TrendSide {
            team: team.clone(),
            filter: filter.clone(),
            games_used: self.games,
            full_game: self.full_game,
            halves: self.halves,
            field_goals: self.field_goals,
            notice: self.notice,
        }
    }
}

fn paired(
    label: impl Into<String>,
    away: &SideCounts,
    home: &SideCounts,
    pick: impl Fn(&SideCounts) -> Option<TrendCell>,
) -> TrendRow {
    TrendRow {
        label: label.into(),
        away: pick(away),
        home: pick(home),
        highlightable: true,
    }
}

fn line_count<K: Ord>(map: &BTreeMap<K, OverUnder>, line: &K) -> OverUnder {
    map.get(line).copied().unwrap_or_default()
}

fn full_game_section(away: &SideCounts, home: &SideCounts) -> TrendSection {
    let mut rows = vec![TrendRow {
        label: "Played".to_string(),
        away: away.full(away.games),
        home: home.full(home.games),
        highlightable: false,
    }];
    rows.push(paired("Won", away, home, |s| s.full(s.counts.wl.game.wins)));
    rows.push(paired("Lost", away, home, |s| s.full(s.counts.wl.game.losses)));
    rows.push(paired("Tied", away, home, |s| s.full(s.counts.wl.game.ties)));
    for line in GAME_TOTAL_LINES {
        rows.push(paired(format!("Over {} pts", line), away, home, |s| {
            s.full(line_count(&s.counts.game, &line).over)
        }));
    }
    for line in GAME_TOTAL_LINES {
        rows.push(paired(format!("Under {} pts", line), away, home, |s| {
            s.full(line_count(&s.counts.game, &line).under)
        }));
    }
    for line in FG_GAME_LINES {
        let label = line.label.to_string();
        rows.push(paired(format!("Over {} FG", line.label), away, home, |s| {
            s.fg(line_count(&s.counts.fg.game, &label).over)
        }));
        rows.push(paired(format!("Under {} FG", line.label), away, home, |s| {
            s.fg(line_count(&s.counts.fg.game, &label).under)
        }));
    }
    TrendSection {
        title: SECTION_FULL_GAME,
        rows,
    }
}

type HalfParts<'a> = (
    &'a BTreeMap<u32, OverUnder>,
    WinLossTie,
    &'a BTreeMap<String, OverUnder>,
);

fn half_section(
    title: &'static str,
    away: &SideCounts,
    home: &SideCounts,
    parts: for<'a> fn(&'a TrendCounts) -> HalfParts<'a>,
) -> TrendSection {
    let mut rows = vec![TrendRow {
        label: "Played".to_string(),
        away: away.half(away.half_games),
        home: home.half(home.half_games),
        highlightable: false,
    }];
    rows.push(paired("Won", away, home, |s| s.half(parts(&s.counts).1.wins)));
    rows.push(paired("Lost", away, home, |s| s.half(parts(&s.counts).1.losses)));
    rows.push(paired("Tied", away, home, |s| s.half(parts(&s.counts).1.ties)));
    for line in HALF_TOTAL_LINES {
        rows.push(paired(format!("Over {} pts", line), away, home, |s| {
            s.half(line_count(parts(&s.counts).0, &line).over)
        }));
    }
    for line in HALF_TOTAL_LINES {
        rows.push(paired(format!("Under {} pts", line), away, home, |s| {
            s.half(line_count(parts(&s.counts).0, &line).under)
        }));
    }
    for line in FG_HALF_LINES {
        let label = line.label.to_string();
        rows.push(paired(format!("Over {} FG", line.label), away, home, |s| {
            s.fg(line_count(parts(&s.counts).2, &label).over)
        }));
        rows.push(paired(format!("Under {} FG", line.label), away, home, |s| {
            s.fg(line_count(parts(&s.counts).2, &label).under)
        }));
    }
    TrendSection { title, rows }
}

fn margin_section(away: &SideCounts, home: &SideCounts) -> TrendSection {
    let mut rows = Vec::new();
    for line in MARGIN_LINES {
        rows.push(paired(format!("Win by {}+", line), away, home, |s| {
            s.full(s.counts.margin.get(&line).map(|m| m.win_by).unwrap_or(0))
        }));
    }
    for line in MARGIN_LINES {
        rows.push(paired(format!("Lose by {}+", line), away, home, |s| {
            s.full(s.counts.margin.get(&line).map(|m| m.lose_by).unwrap_or(0))
        }));
    }
    TrendSection {
        title: SECTION_MARGIN,
        rows,
    }
}
