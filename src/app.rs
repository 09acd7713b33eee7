//! Application operations that combine the provider with the statistics core.
//!
//! Network work happens here, under timeouts; once records are in hand the
//! synchronous calculators in [`crate::calculate`] take over.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{aggregate, build_match_detail, compare};
use crate::fetch::{FetchError, StatsProvider};
use crate::models::{
    ComparisonResult, LifetimeStats, MatchDetail, MatchId, MatchRecord, MatchScoreboard,
    PlayerProfile, StatsSummary,
};

/// Overall budget for fetching both sides of a comparison.
pub const COMPARISON_TIMEOUT: Duration = Duration::from_secs(15);

/// Budget for loading one player's match history.
pub const MATCH_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Game tried when the configured game has no lifetime stats.
pub const FALLBACK_GAME: &str = "csgo";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("No matches found for {0}")]
    NoMatches(String),

    #[error("Match {index} is out of range (1-{available})")]
    MatchIndexOutOfRange { index: usize, available: usize },
}

/// Profile, recent matches and their aggregate.
#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub profile: PlayerProfile,
    pub matches: Vec<MatchRecord>,
    pub stats: StatsSummary,
}

/// Two players side by side. `result` holds `a - b` deltas.
#[derive(Debug, Clone)]
pub struct PlayerComparison {
    pub a: PlayerSummary,
    pub b: PlayerSummary,
    pub result: ComparisonResult,
}

pub struct App {
    provider: Arc<dyn StatsProvider>,
    game: String,
    comparison_timeout: Duration,
    match_load_timeout: Duration,
}

impl App {
    pub fn new(provider: Arc<dyn StatsProvider>, game: impl Into<String>) -> Self {
        Self {
            provider,
            game: game.into(),
            comparison_timeout: COMPARISON_TIMEOUT,
            match_load_timeout: MATCH_LOAD_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, comparison: Duration, match_load: Duration) -> Self {
        self.comparison_timeout = comparison;
        self.match_load_timeout = match_load;
        self
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub async fn find_player(&self, nickname: &str) -> Result<PlayerProfile, AppError> {
        Ok(self.provider.player_by_nickname(nickname).await?)
    }

    /// Newest-first match history, bounded by the match load timeout.
    pub async fn recent_matches(
        &self,
        profile: &PlayerProfile,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let fetch = self.provider.recent_matches(&profile.id, &self.game, limit);
        let matches = tokio::time::timeout(self.match_load_timeout, fetch)
            .await
            .map_err(|_| AppError::Timeout {
                operation: "loading matches",
                seconds: self.match_load_timeout.as_secs(),
            })??;
        info!("{} matches loaded for {}", matches.len(), profile.nickname);
        Ok(matches)
    }

    /// Look up a player and aggregate their last `limit` matches.
    pub async fn player_summary(
        &self,
        nickname: &str,
        limit: usize,
    ) -> Result<PlayerSummary, AppError> {
        let profile = self.find_player(nickname).await?;
        let matches = self.recent_matches(&profile, limit).await?;
        let stats = aggregate(&matches);
        Ok(PlayerSummary {
            profile,
            matches,
            stats,
        })
    }

    /// Fetch both players concurrently and compare their aggregates.
    pub async fn compare(
        &self,
        nickname_a: &str,
        nickname_b: &str,
        limit: usize,
    ) -> Result<PlayerComparison, AppError> {
        let both = async {
            tokio::try_join!(
                self.player_summary(nickname_a, limit),
                self.player_summary(nickname_b, limit)
            )
        };
        let (a, b) = tokio::time::timeout(self.comparison_timeout, both)
            .await
            .map_err(|_| AppError::Timeout {
                operation: "comparison",
                seconds: self.comparison_timeout.as_secs(),
            })??;

        let result = compare(&a.stats, &b.stats);
        Ok(PlayerComparison { a, b, result })
    }

    /// Drill into the match at a 1-based position in a loaded list.
    pub fn match_detail(
        &self,
        nickname: &str,
        matches: &[MatchRecord],
        index: usize,
    ) -> Result<MatchDetail, AppError> {
        if matches.is_empty() {
            return Err(AppError::NoMatches(nickname.to_string()));
        }
        let record = index
            .checked_sub(1)
            .and_then(|i| matches.get(i))
            .ok_or(AppError::MatchIndexOutOfRange {
                index,
                available: matches.len(),
            })?;
        Ok(build_match_detail(record))
    }

    /// Lifetime stats for the configured game, or for the legacy game when
    /// the configured one is missing or empty.
    pub async fn lifetime(&self, profile: &PlayerProfile) -> Result<LifetimeStats, AppError> {
        let primary = self.provider.lifetime_stats(&profile.id, &self.game).await;
        if matches!(&primary, Ok(stats) if !stats.is_empty()) || self.game == FALLBACK_GAME {
            return Ok(primary?);
        }

        match &primary {
            Ok(_) => warn!(
                "No {} lifetime stats for {}, trying {}",
                self.game, profile.nickname, FALLBACK_GAME
            ),
            Err(e) => warn!(
                "Lifetime stats for {} failed ({}), trying {}",
                profile.nickname, e, FALLBACK_GAME
            ),
        }

        match self.provider.lifetime_stats(&profile.id, FALLBACK_GAME).await {
            Ok(fallback) if !fallback.is_empty() => Ok(fallback),
            fallback => match primary {
                Ok(empty) => Ok(empty),
                Err(e) => {
                    if let Err(other) = fallback {
                        warn!("{} lifetime stats also failed: {}", FALLBACK_GAME, other);
                    }
                    Err(e.into())
                }
            },
        }
    }

    pub async fn scoreboard(&self, match_id: &str) -> Result<MatchScoreboard, AppError> {
        Ok(self
            .provider
            .match_scoreboard(&MatchId::new(match_id.trim()))
            .await?)
    }
}
