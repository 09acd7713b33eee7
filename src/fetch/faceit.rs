//! HTTP client for the FACEIT Data API v4.

use std::future::Future;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::wire::{
    HistoryItem, HistoryResponse, MatchResponse, MatchStatsResponse, PlayerResponse,
    PlayerStatsResponse, SearchPlayersResponse,
};
use super::{convert, ClientConfig, FetchError, StatsProvider, DEFAULT_MATCH_LIMIT, MAX_PAGE_SIZE};
use crate::models::{
    GameDetail, LifetimeStats, MatchId, MatchRecord, MatchScoreboard, PlayerId, PlayerProfile,
};

/// Client for the public FACEIT API.
#[derive(Debug, Clone)]
pub struct FaceitClient {
    client: Client,
    base_url: Url,
}

impl FaceitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("faceit-stats")),
        );

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| FetchError::InvalidArgument("API key contains invalid characters"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        // Url::join drops the last path segment unless it ends with '/'
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&base).map_err(|_| FetchError::InvalidArgument("invalid API base URL"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// GET a path below the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| FetchError::InvalidArgument("invalid request path"))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                return Err(FetchError::RateLimited {
                    retry_after_secs: retry_after,
                });
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(FetchError::Unauthorized);
            }
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(path.to_string())),
            _ if !status.is_success() => {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Unknown").to_string(),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn player_by_id(&self, player_id: &str) -> Result<PlayerProfile, FetchError> {
        let player: PlayerResponse = self
            .get_json(&format!("players/{}", player_id), &[])
            .await
            .map_err(|e| match e {
                FetchError::NotFound(_) => FetchError::PlayerNotFound(player_id.to_string()),
                other => other,
            })?;

        Ok(PlayerProfile {
            id: player.player_id.into(),
            nickname: player.nickname,
            country: player.country,
            avatar: player.avatar,
            faceit_url: player.faceit_url,
            games: player
                .games
                .into_iter()
                .map(|(game, detail)| {
                    (
                        game,
                        GameDetail {
                            elo: detail.faceit_elo,
                            skill_level: detail.skill_level,
                            region: detail.region,
                        },
                    )
                })
                .collect(),
        })
    }

    async fn history_page(
        &self,
        player_id: &str,
        game: &str,
        offset: usize,
        limit: usize,
    ) -> Result<HistoryResponse, FetchError> {
        self.get_json(
            &format!("players/{}/history", player_id),
            &[
                ("game", game.to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn match_stats(&self, match_id: &str) -> Result<MatchStatsResponse, FetchError> {
        self.get_json(&format!("matches/{}/stats", match_id), &[])
            .await
    }
}

/// Walk an offset-paged listing until `limit` items arrive (0 means
/// [`DEFAULT_MATCH_LIMIT`]). `fetch_page` gets `(offset, size)` with `size` at
/// most [`MAX_PAGE_SIZE`]; a page shorter than requested ends the walk.
async fn collect_pages<T, F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let limit = if limit == 0 { DEFAULT_MATCH_LIMIT } else { limit };

    let mut items = Vec::with_capacity(limit.min(MAX_PAGE_SIZE));
    let mut offset = 0;

    while items.len() < limit {
        let batch_size = (limit - items.len()).min(MAX_PAGE_SIZE);
        let page = fetch_page(offset, batch_size).await?;
        let received = page.len();
        debug!(
            "History page offset={} size={} received={}",
            offset, batch_size, received
        );
        items.extend(page);

        if received < batch_size {
            break;
        }
        offset += received;
    }

    items.truncate(limit);
    Ok(items)
}

/// Record for one history entry. A failed stats call keeps the match with
/// zeroed numbers.
fn record_with_stats(
    item: &HistoryItem,
    player_id: &str,
    stats: Result<MatchStatsResponse, FetchError>,
) -> MatchRecord {
    let stats = match stats {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Skipping stats for match {}: {}", item.match_id, e);
            None
        }
    };
    convert::match_record(item, player_id, stats.as_ref())
}

#[async_trait]
impl StatsProvider for FaceitClient {
    fn name(&self) -> &'static str {
        "faceit"
    }

    async fn player_by_nickname(&self, nickname: &str) -> Result<PlayerProfile, FetchError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(FetchError::InvalidArgument("nickname cannot be empty"));
        }

        info!("Searching for player {}", nickname);
        let search: SearchPlayersResponse = self
            .get_json(
                "search/players",
                &[("nickname", nickname.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        let hit = search
            .items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::PlayerNotFound(nickname.to_string()))?;
        debug!("Resolved {} to {} ({})", nickname, hit.player_id, hit.nickname);

        self.player_by_id(&hit.player_id).await
    }

    async fn lifetime_stats(
        &self,
        player_id: &PlayerId,
        game: &str,
    ) -> Result<LifetimeStats, FetchError> {
        if player_id.is_empty() {
            return Err(FetchError::InvalidArgument("player id cannot be empty"));
        }

        let stats: PlayerStatsResponse = self
            .get_json(&format!("players/{}/stats/{}", player_id, game), &[])
            .await
            .map_err(|e| match e {
                FetchError::NotFound(_) => FetchError::PlayerNotFound(player_id.to_string()),
                other => other,
            })?;

        Ok(LifetimeStats {
            player_id: if stats.player_id.is_empty() {
                player_id.clone()
            } else {
                stats.player_id.into()
            },
            game_id: if stats.game_id.is_empty() {
                game.to_string()
            } else {
                stats.game_id
            },
            lifetime: stats.lifetime,
            segments: stats.segments,
        })
    }

    async fn recent_matches(
        &self,
        player_id: &PlayerId,
        game: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        if player_id.is_empty() {
            return Err(FetchError::InvalidArgument("player id cannot be empty"));
        }
        let records = collect_pages(limit, move |offset, size| async move {
            let page = self
                .history_page(player_id.as_str(), game, offset, size)
                .await?;
            let mut records = Vec::with_capacity(page.items.len());
            for item in &page.items {
                let stats = self.match_stats(&item.match_id).await;
                records.push(record_with_stats(item, player_id.as_str(), stats));
            }
            Ok(records)
        })
        .await?;

        info!("Loaded {} matches for {}", records.len(), player_id);
        Ok(records)
    }

    async fn match_scoreboard(&self, match_id: &MatchId) -> Result<MatchScoreboard, FetchError> {
        if match_id.is_empty() {
            return Err(FetchError::InvalidArgument("match id cannot be empty"));
        }

        let details: MatchResponse = self
            .get_json(&format!("matches/{}", match_id), &[])
            .await
            .map_err(|e| match e {
                FetchError::NotFound(_) => FetchError::MatchNotFound(match_id.to_string()),
                other => other,
            })?;

        match self.match_stats(match_id.as_str()).await {
            Ok(stats) => Ok(convert::scoreboard(&details, &stats)),
            Err(e) => {
                warn!("Stats unavailable for match {}: {}", match_id, e);
                Ok(MatchScoreboard::without_stats(
                    match_id.clone(),
                    details.finished_at,
                    details.status,
                ))
            }
        }
    }
}
