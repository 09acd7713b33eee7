//! Stats provider abstraction and the FACEIT Data API client.
//!
//! The statistics engine only ever sees [`MatchRecord`] lists; everything
//! about talking to the API (auth, pagination, per-match enrichment, odd
//! value encodings) stays behind [`StatsProvider`].

mod convert;
mod faceit;
#[cfg(test)]
pub(crate) mod mock;
mod wire;

pub use faceit::FaceitClient;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{LifetimeStats, MatchId, MatchRecord, MatchScoreboard, PlayerId, PlayerProfile};

/// Default FACEIT Data API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.faceit.com/data/v4";

/// Match count used when a caller asks for zero matches.
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// Largest page the history endpoint serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors that can occur while talking to the stats API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("API key rejected")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Match not found: {0}. Please check the Match ID and try again")]
    MatchNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of player and match data.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Resolve a nickname to a full profile.
    async fn player_by_nickname(&self, nickname: &str) -> Result<PlayerProfile, FetchError>;

    /// Lifetime statistics for one game.
    async fn lifetime_stats(
        &self,
        player_id: &PlayerId,
        game: &str,
    ) -> Result<LifetimeStats, FetchError>;

    /// Most recent matches, newest first. A `limit` of 0 means
    /// [`DEFAULT_MATCH_LIMIT`].
    async fn recent_matches(
        &self,
        player_id: &PlayerId,
        game: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, FetchError>;

    /// Both teams' scoreboard for a match.
    async fn match_scoreboard(&self, match_id: &MatchId) -> Result<MatchScoreboard, FetchError>;
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash
    pub base_url: String,

    /// Sent as a bearer token on every request
    pub api_key: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
            user_agent: concat!("faceit-stats/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
