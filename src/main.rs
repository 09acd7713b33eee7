use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faceit_stats::app::App;
use faceit_stats::cache::CachedProvider;
use faceit_stats::config::AppConfig;
use faceit_stats::fetch::{FaceitClient, StatsProvider};
use faceit_stats::parse_duration;
use faceit_stats::render;
use faceit_stats::shell::Session;

#[derive(Parser)]
#[command(name = "faceit-stats")]
#[command(about = "FACEIT match history, rolling stats and player comparison")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Disable the in-memory response cache
    #[arg(long)]
    no_cache: bool,

    /// Cache lifetime (e.g., "10m", "1h"), overrides the config file
    #[arg(long)]
    cache_ttl: Option<String>,

    /// Game id (e.g., "cs2", "csgo")
    #[arg(long)]
    game: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a player's profile
    Profile {
        /// Player nickname (defaults to display.default_player)
        nickname: Option<String>,
    },

    /// List recent matches
    Matches {
        nickname: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Aggregate stats, streaks and K/D trend
    Stats {
        nickname: Option<String>,

        /// Number of matches to aggregate
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Estimated advanced metrics for one match
    Detail {
        /// Position in the match list, 1 = most recent
        index: usize,

        /// Player nickname (defaults to display.default_player)
        #[arg(long)]
        player: Option<String>,
    },

    /// Compare two players over their recent matches
    Compare {
        a: String,
        b: String,

        /// Matches per player
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Lifetime stats
    Lifetime { nickname: Option<String> },

    /// Full scoreboard for a match
    Scoreboard { match_id: String },

    /// Interactive session
    Interactive { nickname: Option<String> },

    /// Write a starter config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);

    if let Commands::InitConfig { force } = cli.command {
        AppConfig::write_default(&config_path, force)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("Wrote {}", config_path.display());
        println!("Set api.api_key (or FACEIT_API_KEY) before running other commands.");
        return Ok(());
    }

    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(game) = &cli.game {
        config.api.game = game.clone();
    }
    if let Some(ttl) = &cli.cache_ttl {
        let ttl = parse_duration(ttl).with_context(|| format!("invalid --cache-ttl: {}", ttl))?;
        config.cache.ttl_minutes = ttl.as_secs().div_ceil(60);
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }

    // Initialize tracing; reports own stdout
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let json = cli.json_logs || config.json_logs;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::info!("Starting faceit-stats v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    let provider = build_provider(&config)?;
    tracing::info!("Using {} provider for {}", provider.name(), config.api.game);
    let app = App::new(provider, config.api.game.clone());

    match cli.command {
        Commands::Profile { nickname } => {
            let nickname = resolve_player(nickname, &config)?;
            let profile = app.find_player(&nickname).await?;
            println!("{}", render::profile(&profile, app.game()));
        }
        Commands::Matches { nickname, page } => {
            let nickname = resolve_player(nickname, &config)?;
            let per_page = config.display.matches_per_page;
            let page = page.max(1);
            let limit = (page * per_page).min(config.display.max_matches_to_load);

            let profile = app.find_player(&nickname).await?;
            let matches = app.recent_matches(&profile, limit).await?;
            println!("{}", render::match_page(&matches, page - 1, per_page));
        }
        Commands::Stats { nickname, limit } => {
            let nickname = resolve_player(nickname, &config)?;
            let limit = limit.unwrap_or(config.display.max_matches_to_load);
            let summary = app.player_summary(&nickname, limit).await?;
            println!("{}", render::stats(&summary.profile.nickname, &summary.stats));
        }
        Commands::Detail { index, player } => {
            let nickname = resolve_player(player, &config)?;
            let profile = app.find_player(&nickname).await?;
            let matches = app.recent_matches(&profile, index.max(1)).await?;
            let detail = app.match_detail(&profile.nickname, &matches, index)?;
            println!("{}", render::match_detail(&detail));
        }
        Commands::Compare { a, b, limit } => {
            let limit = limit.unwrap_or(config.display.comparison_matches);
            let comparison = app.compare(&a, &b, limit).await?;
            println!("{}", render::comparison(&comparison));
        }
        Commands::Lifetime { nickname } => {
            let nickname = resolve_player(nickname, &config)?;
            let profile = app.find_player(&nickname).await?;
            let stats = app.lifetime(&profile).await?;
            println!("{}", render::lifetime(&profile.nickname, &stats));
        }
        Commands::Scoreboard { match_id } => {
            let board = app.scoreboard(&match_id).await?;
            println!("{}", render::scoreboard(&board));
        }
        Commands::Interactive { nickname } => {
            let initial = nickname.or_else(|| {
                Some(config.display.default_player.clone()).filter(|p| !p.is_empty())
            });
            Session::new(app, config.display.clone())
                .run(initial)
                .await
                .context("reading input")?;
        }
        // Handled before the config is loaded
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

/// FACEIT client, wrapped in the response cache when enabled.
fn build_provider(config: &AppConfig) -> Result<Arc<dyn StatsProvider>> {
    let client = FaceitClient::new(config.client_config()).context("building HTTP client")?;

    if !config.cache.enabled {
        tracing::info!("Response cache disabled");
        return Ok(Arc::new(client));
    }

    let cached = Arc::new(CachedProvider::new(client, config.cache.ttl()));
    if config.cache.sweep_interval_seconds > 0 {
        cached.spawn_sweeper(config.cache.sweep_interval());
    }
    let stats = cached.cache_stats();
    tracing::debug!("Response cache enabled (ttl {:?})", stats.ttl);
    Ok(cached)
}

/// Nickname from the command line, else the configured default.
fn resolve_player(nickname: Option<String>, config: &AppConfig) -> Result<String> {
    nickname
        .filter(|n| !n.trim().is_empty())
        .or_else(|| Some(config.display.default_player.clone()).filter(|p| !p.is_empty()))
        .context("no nickname given and display.default_player is not set")
}
