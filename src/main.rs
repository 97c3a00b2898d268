use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use matchup_trends::config::AppConfig;
use matchup_trends::fetch::{HttpStatsSource, StatsSource};
use matchup_trends::format_season;
use matchup_trends::matchup::{
    MatchupCache, MatchupOrchestrator, MatchupSelection, StatsComparison, TrendsComparison,
    PLACEHOLDER,
};
use matchup_trends::models::{
    Conference, Division, FilterSpec, MetricDomain, TeamCode, Venue,
};

#[derive(Parser)]
#[command(name = "matchup-trends")]
#[command(about = "NFL matchup comparison: records, league ranks and threshold trends")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare offense, defense and special-teams stats of two teams
    Compare(PairArgs),

    /// Show threshold trends for two teams over the schedule history
    Trends(PairArgs),

    /// Show one team's league rank on a metric
    Rank {
        /// Metric domain (offense, defense, st)
        domain: MetricDomain,

        /// Metric key (e.g. points_per_game, pa, w)
        metric: String,

        /// Team code (e.g. KC)
        team: String,

        /// Only the last N games
        #[arg(long)]
        last_n: Option<usize>,

        /// Only home or away games
        #[arg(long)]
        venue: Option<Venue>,
    },

    /// Show league standings with conference W/L ranks
    Standings,
}

#[derive(Args)]
struct PairArgs {
    /// Away team code
    away: String,

    /// Home team code
    home: String,

    #[arg(long)]
    away_last_n: Option<usize>,

    #[arg(long)]
    away_venue: Option<Venue>,

    /// Opponent conference for the away side (AFC, NFC)
    #[arg(long)]
    away_conf: Option<Conference>,

    /// Opponent division for the away side (e.g. "AFC West")
    #[arg(long)]
    away_div: Option<Division>,

    #[arg(long)]
    home_last_n: Option<usize>,

    #[arg(long)]
    home_venue: Option<Venue>,

    #[arg(long)]
    home_conf: Option<Conference>,

    #[arg(long)]
    home_div: Option<Division>,
}

impl PairArgs {
    fn selection(&self) -> MatchupSelection {
        let away = side_filter(self.away_last_n, self.away_venue, self.away_conf, self.away_div);
        let home = side_filter(self.home_last_n, self.home_venue, self.home_conf, self.home_div);
        MatchupSelection::new(self.away.as_str(), self.home.as_str()).with_filters(away, home)
    }
}

fn side_filter(
    last_n: Option<usize>,
    venue: Option<Venue>,
    conference: Option<Conference>,
    division: Option<Division>,
) -> FilterSpec {
    let mut spec = FilterSpec::new();
    if let Some(n) = last_n {
        spec = spec.with_last_n(n);
    }
    if let Some(venue) = venue {
        spec = spec.with_venue(venue);
    }
    if let Some(conference) = conference {
        spec = spec.with_opponent_conference(conference);
    }
    if let Some(division) = division {
        spec = spec.with_opponent_division(division);
    }
    spec
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => {
            let default_path = Path::new("./config.toml");
            if default_path.exists() {
                AppConfig::from_file(default_path).context("loading ./config.toml")
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    tracing::info!("Starting matchup-trends v{}", env!("CARGO_PKG_VERSION"));

    let source: Arc<dyn StatsSource> = Arc::new(HttpStatsSource::new(config.api.fetcher_config()?)?);
    let orchestrator = MatchupOrchestrator::new(
        source,
        Arc::new(MatchupCache::new()),
        config.matchup.clone(),
    );

    match cli.command {
        Commands::Compare(args) => {
            let selection = args.selection();
            let comparison = orchestrator
                .load_stats(&selection)
                .await
                .ok_or_else(|| anyhow!("stats load was superseded"))?;
            print_stats(&comparison);
        }
        Commands::Trends(args) => {
            let selection = args.selection();
            let comparison = orchestrator
                .load_trends(&selection)
                .await
                .ok_or_else(|| anyhow!("trends load was superseded"))?;
            print_trends(&comparison);
        }
        Commands::Rank {
            domain,
            metric,
            team,
            last_n,
            venue,
        } => {
            let filter = side_filter(last_n, venue, None, None);
            let team = TeamCode::new(&team);
            let rank = orchestrator
                .league_rank(domain, &metric, &team, &filter)
                .await
                .with_context(|| format!("ranking {} on {}", team, metric))?;

            println!("\n=== League Rank ({}) ===", format_season(config.matchup.season));
            println!("Team:     {}", rank.team);
            println!("Metric:   {}", rank.metric);
            println!(
                "Value:    {}",
                rank.value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| PLACEHOLDER.to_string())
            );
            match rank.rank {
                Some(r) => println!("Rank:     {} of {}", matchup_trends::calculate::ordinal(r), rank.table_size),
                None => println!("Rank:     {}", PLACEHOLDER),
            }
        }
        Commands::Standings => {
            let standings = orchestrator.load_standings().await.context("loading standings")?;
            println!("\n=== Standings {} ===", format_season(standings.season));
            for (conference, lines) in &standings.conferences {
                println!("\n{}", conference);
                println!("  {:<4} {:<5} {:>3} {:>3} {:>3} {:>6}  {}", "#", "Team", "W", "L", "T", "Pct", "Division");
                for line in lines {
                    println!(
                        "  {:<4} {:<5} {:>3} {:>3} {:>3} {:>6}  {}",
                        line.conference_rank.map(|r| r.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
                        line.team,
                        line.record.wins,
                        line.record.losses,
                        line.record.ties,
                        line.pct.map(|p| format!("{:.3}", p)).unwrap_or_else(|| PLACEHOLDER.to_string()),
                        line.division.as_deref().unwrap_or(PLACEHOLDER),
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_stats(comparison: &StatsComparison) {
    let away = &comparison.away;
    let home = &comparison.home;

    println!("\n=== {} @ {} ===", away.team, home.team);
    for side in [away, home] {
        let games = side.games.map(|g| g.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string());
        println!("{:<5} games: {}", side.team, games);
        if side.notice.is_warning() {
            println!("      ! {}", side.notice);
        }
    }

    for section in &comparison.sections {
        println!("\n{}", section.title);
        for row in &section.rows {
            println!(
                "  {:<28} {:>8} {:>6}   {:>8} {:>6}",
                row.label,
                row.away.display_value(),
                row.away.display_rank(),
                row.home.display_value(),
                row.home.display_rank(),
            );
        }
    }

    if comparison.failed_fetches > 0 {
        println!("\n({} fetches failed; shown as {})", comparison.failed_fetches, PLACEHOLDER);
    }
}

fn print_trends(comparison: &TrendsComparison) {
    let away = &comparison.away;
    let home = &comparison.home;

    println!("\n=== {} @ {} trends ===", away.team, home.team);
    for side in [away, home] {
        println!("{:<5} games used: {}", side.team, side.games_used);
        if side.notice.is_warning() {
            println!("      ! {}", side.notice);
        }
    }

    for section in &comparison.sections {
        println!("\n{}", section.title);
        for row in &section.rows {
            println!(
                "  {:<24} {:>6} {:>6}",
                row.label,
                row.display_cell(row.away),
                row.display_cell(row.home),
            );
        }
    }

    if !comparison.head_to_head.is_empty() {
        println!("\nHead to head");
        for game in &comparison.head_to_head {
            let score = match (game.away_score, game.home_score) {
                (Some(a), Some(h)) => format!("{}-{}", a, h),
                _ => PLACEHOLDER.to_string(),
            };
            println!(
                "  {:<10} {} @ {}  {}",
                game.date_str().unwrap_or(PLACEHOLDER),
                game.away_team,
                game.home_team,
                score
            );
        }
    }

    if comparison.schedule_partial {
        println!("\n(some seasons failed to load; history is incomplete)");
    }
}
