//! Single-match drill-down view.

use serde::{Deserialize, Serialize};

use super::{MatchId, MatchResult};

/// Player line for the detail view. Everything past `adr` is estimated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kd_ratio: f64,
    pub headshot_pct: f64,
    pub adr: f64,
    pub rating: f64,
    pub first_kills: u32,
    pub first_deaths: u32,
    pub clutch_wins: u32,
    pub entry_frags: u32,
    pub flash_assists: u32,
    pub utility_damage: u32,
}

/// Both halves of the recorded score, in the order they were written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub player_team: u32,
    pub enemy_team: u32,
}

/// Heuristic 0-100ish scores shown next to the player line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub consistency: f64,
    pub impact: f64,
    pub clutch: f64,
    pub entry: f64,
    pub support: f64,
}

/// A match record enriched with estimator output. Recomputed on every view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub match_id: MatchId,
    pub map: String,
    pub finished_at: i64,
    pub score: String,
    pub result: MatchResult,
    pub player: AdvancedStats,
    pub team_score: TeamScore,
    pub performance: PerformanceScores,
}
