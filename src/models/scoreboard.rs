//! Full-match scoreboard looked up by match id.

use serde::{Deserialize, Serialize};

use super::{MatchId, PlayerId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardPlayer {
    pub player_id: PlayerId,
    pub nickname: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kd_ratio: f64,
    pub headshot_pct: f64,
    pub adr: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamScoreboard {
    pub name: String,
    pub score: u32,
    pub players: Vec<ScoreboardPlayer>,
}

/// Both teams of a match with per-player lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchScoreboard {
    pub match_id: MatchId,
    pub map: String,
    pub finished_at: i64,
    pub score: String,
    /// Match status as reported upstream ("FINISHED", ...)
    pub status: String,
    pub teams: Vec<TeamScoreboard>,
}

impl MatchScoreboard {
    /// Scoreboard used when the match exists but its stats are unavailable.
    pub fn without_stats(match_id: MatchId, finished_at: i64, status: String) -> Self {
        Self {
            match_id,
            map: "Unknown".to_string(),
            finished_at,
            score: "N/A".to_string(),
            status,
            teams: Vec::new(),
        }
    }

    /// Find a player's line by id across both teams.
    pub fn player(&self, player_id: &PlayerId) -> Option<&ScoreboardPlayer> {
        self.teams
            .iter()
            .flat_map(|t| t.players.iter())
            .find(|p| &p.player_id == player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_stats() {
        let board = MatchScoreboard::without_stats("1-x".into(), 42, "FINISHED".to_string());
        assert_eq!(board.map, "Unknown");
        assert_eq!(board.score, "N/A");
        assert!(board.teams.is_empty());
    }

    #[test]
    fn test_player_lookup() {
        let board = MatchScoreboard {
            teams: vec![
                TeamScoreboard {
                    name: "A".to_string(),
                    score: 13,
                    players: vec![ScoreboardPlayer {
                        player_id: "p1".into(),
                        nickname: "one".to_string(),
                        ..Default::default()
                    }],
                },
                TeamScoreboard {
                    name: "B".to_string(),
                    score: 7,
                    players: vec![ScoreboardPlayer {
                        player_id: "p2".into(),
                        nickname: "two".to_string(),
                        ..Default::default()
                    }],
                },
            ],
            ..Default::default()
        };

        assert_eq!(board.player(&"p2".into()).map(|p| p.nickname.as_str()), Some("two"));
        assert!(board.player(&"p3".into()).is_none());
    }
}
