//! In-memory provider for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, StatsProvider, DEFAULT_MATCH_LIMIT};
use crate::models::{
    LifetimeStats, MatchId, MatchRecord, MatchScoreboard, PlayerId, PlayerProfile,
};

/// Canned responses keyed by nickname / player id / match id.
#[derive(Default)]
pub(crate) struct MockProvider {
    pub profiles: HashMap<String, PlayerProfile>,
    pub matches: HashMap<PlayerId, Vec<MatchRecord>>,
    /// Keyed by (player id, game)
    pub lifetime: HashMap<(PlayerId, String), LifetimeStats>,
    pub scoreboards: HashMap<MatchId, MatchScoreboard>,
    /// Artificial latency on every call
    pub delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with the given matches (newest first).
    pub fn with_player(mut self, nickname: &str, matches: Vec<MatchRecord>) -> Self {
        let id = PlayerId::new(format!("id-{}", nickname));
        self.profiles.insert(
            nickname.to_string(),
            PlayerProfile {
                id: id.clone(),
                nickname: nickname.to_string(),
                country: "gb".to_string(),
                ..Default::default()
            },
        );
        self.matches.insert(id, matches);
        self
    }

    pub fn with_lifetime(mut self, stats: LifetimeStats) -> Self {
        self.lifetime
            .insert((stats.player_id.clone(), stats.game_id.clone()), stats);
        self
    }

    pub fn with_scoreboard(mut self, board: MatchScoreboard) -> Self {
        self.scoreboards.insert(board.match_id.clone(), board);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of trait calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StatsProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn player_by_nickname(&self, nickname: &str) -> Result<PlayerProfile, FetchError> {
        self.tick().await;
        if nickname.trim().is_empty() {
            return Err(FetchError::InvalidArgument("nickname cannot be empty"));
        }
        self.profiles
            .get(nickname)
            .cloned()
            .ok_or_else(|| FetchError::PlayerNotFound(nickname.to_string()))
    }

    async fn lifetime_stats(
        &self,
        player_id: &PlayerId,
        game: &str,
    ) -> Result<LifetimeStats, FetchError> {
        self.tick().await;
        self.lifetime
            .get(&(player_id.clone(), game.to_string()))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("players/{}/stats/{}", player_id, game)))
    }

    async fn recent_matches(
        &self,
        player_id: &PlayerId,
        _game: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        self.tick().await;
        let limit = if limit == 0 { DEFAULT_MATCH_LIMIT } else { limit };
        let matches = self
            .matches
            .get(player_id)
            .ok_or_else(|| FetchError::PlayerNotFound(player_id.to_string()))?;
        Ok(matches.iter().take(limit).cloned().collect())
    }

    async fn match_scoreboard(&self, match_id: &MatchId) -> Result<MatchScoreboard, FetchError> {
        self.tick().await;
        self.scoreboards
            .get(match_id)
            .cloned()
            .ok_or_else(|| FetchError::MatchNotFound(match_id.to_string()))
    }
}
