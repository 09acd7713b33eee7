//! Response shapes of the FACEIT Data API v4.
//!
//! Only the fields the client reads are declared; everything is defaulted so
//! that partially populated responses still decode.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPlayersResponse {
    #[serde(default)]
    pub items: Vec<SearchPlayerItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPlayerItem {
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerResponse {
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub faceit_url: String,
    #[serde(default)]
    pub games: HashMap<String, GameResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameResponse {
    #[serde(default)]
    pub faceit_elo: u32,
    #[serde(default)]
    pub skill_level: u32,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerStatsResponse {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub lifetime: Map<String, Value>,
    #[serde(default)]
    pub segments: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryItem {
    pub match_id: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub finished_at: i64,
    /// Keyed by faction id ("faction1", "faction2")
    #[serde(default)]
    pub teams: HashMap<String, HistoryFaction>,
    #[serde(default)]
    pub results: Option<HistoryResults>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryFaction {
    #[serde(default)]
    pub players: Vec<HistoryPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryPlayer {
    pub player_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryResults {
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub score: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchResponse {
    pub match_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub finished_at: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchStatsResponse {
    #[serde(default)]
    pub rounds: Vec<RoundStats>,
}

/// One map of a series. A best-of-one match has a single round entry.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoundStats {
    #[serde(default)]
    pub round_stats: Map<String, Value>,
    #[serde(default)]
    pub teams: Vec<RoundTeam>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoundTeam {
    #[serde(default)]
    pub team_stats: Map<String, Value>,
    #[serde(default)]
    pub players: Vec<RoundPlayer>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoundPlayer {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub player_stats: Map<String, Value>,
}
