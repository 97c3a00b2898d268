//! Stats API access.
//!
//! [`StatsSource`] is the seam between the orchestration layer and the REST
//! backend; [`HttpStatsSource`] implements it over reqwest. Responses are
//! decoded into the shapes in [`crate::models`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::{
    ExtraFilters, LeagueMetricsResponse, MetricDomain, ScheduleQuery, ScheduleResponse,
    StandingsResponse, StatScope, TeamCode, TeamMetricsResponse, TrendsPayload,
};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the stats client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// API root, e.g. `http://localhost:8000`
    pub base_url: Url,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000").expect("default base URL is valid"),
            timeout: Duration::from_secs(30),
            user_agent: format!("matchup-trends/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Data-fetch contract consumed by the matchup orchestrator.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    async fn schedule(&self, query: &ScheduleQuery) -> Result<ScheduleResponse, FetchError>;

    async fn standings(&self, season: i32) -> Result<StandingsResponse, FetchError>;

    /// One team's metrics for a domain.
    async fn team_metrics(
        &self,
        domain: MetricDomain,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<TeamMetricsResponse, FetchError>;

    /// League-wide metric table for a domain.
    async fn league_metrics(
        &self,
        domain: MetricDomain,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<LeagueMetricsResponse, FetchError>;

    /// Pre-aggregated trend counts for one team.
    async fn team_trends(
        &self,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<TrendsPayload, FetchError>;
}

/// REST implementation of [`StatsSource`].
pub struct HttpStatsSource {
    client: Client,
    config: FetcherConfig,
}

impl HttpStatsSource {
    /// Create a new client with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("matchup-trends")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build an endpoint URL with query parameters.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn scoped_query(scope: &StatScope, filters: &ExtraFilters) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("season", scope.season.to_string()),
            ("game_types", scope.game_types.clone()),
        ];
        query.extend(filters.query_pairs());
        query
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            warn!("Rate limited on {}", url);
            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn schedule(&self, query: &ScheduleQuery) -> Result<ScheduleResponse, FetchError> {
        let url = self.endpoint("/api/nfl/schedule", &query.query_pairs())?;
        self.get_json(url).await
    }

    async fn standings(&self, season: i32) -> Result<StandingsResponse, FetchError> {
        let url = self.endpoint("/api/nfl/standings", &[("season", season.to_string())])?;
        self.get_json(url).await
    }

    async fn team_metrics(
        &self,
        domain: MetricDomain,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<TeamMetricsResponse, FetchError> {
        let path = format!("/api/nfl/team/{}/{}", team, domain.path_segment());
        let url = self.endpoint(&path, &Self::scoped_query(scope, filters))?;
        self.get_json(url).await
    }

    async fn league_metrics(
        &self,
        domain: MetricDomain,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<LeagueMetricsResponse, FetchError> {
        let path = format!("/api/nfl/team/{}/ranks", domain.path_segment());
        let url = self.endpoint(&path, &Self::scoped_query(scope, filters))?;
        self.get_json(url).await
    }

    async fn team_trends(
        &self,
        team: &TeamCode,
        scope: &StatScope,
        filters: &ExtraFilters,
    ) -> Result<TrendsPayload, FetchError> {
        let path = format!("/api/nfl/team/{}/trends", team);
        let url = self.endpoint(&path, &Self::scoped_query(scope, filters))?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSpec, Venue};

    fn source(base: &str) -> HttpStatsSource {
        HttpStatsSource::new(FetcherConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(5),
            user_agent: "test-agent".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_schedule_url() {
        let src = source("http://stats.local:8000");
        let url = src
            .endpoint("/api/nfl/schedule", &ScheduleQuery::season(2024).query_pairs())
            .unwrap();
        assert_eq!(url.as_str(), "http://stats.local:8000/api/nfl/schedule?season=2024");
    }

    #[test]
    fn test_scoped_query_carries_filters() {
        let scope = StatScope::new(2025, "REG");
        let filters = FilterSpec::new()
            .with_last_n(5)
            .with_venue(Venue::Home)
            .to_wire();
        let query = HttpStatsSource::scoped_query(&scope, &filters);

        let src = source("http://localhost:8000/");
        let url = src.endpoint("/api/nfl/team/KC/offense", &query).unwrap();
        assert_eq!(url.path(), "/api/nfl/team/KC/offense");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("season".to_string(), "2025".to_string())));
        assert!(pairs.contains(&("game_types".to_string(), "REG".to_string())));
        assert!(pairs.contains(&("last_n".to_string(), "5".to_string())));
        assert!(pairs.contains(&("venue".to_string(), "home".to_string())));
    }

    #[test]
    fn test_no_query_string_without_params() {
        let src = source("http://localhost:8000");
        let url = src.endpoint("/api/nfl/standings", &[]).unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(src.name(), "http");
    }

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("matchup-trends/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let src = HttpStatsSource::new(FetcherConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_millis(200),
            user_agent: "test-agent".to_string(),
        })
        .unwrap();
        let result = src.standings(2024).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
