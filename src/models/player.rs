//! Player profile and lifetime statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::PlayerId;

/// A player's standing in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetail {
    /// Rating on FACEIT, 0 when missing
    pub elo: u32,

    /// One-to-ten skill level, 0 when missing
    pub skill_level: u32,

    /// Preferred server region (e.g. "EU", "NA")
    pub region: String,
}

/// Profile data for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub nickname: String,
    pub country: String,
    pub avatar: String,
    pub faceit_url: String,

    /// Per-game details keyed by game id ("cs2", "csgo", ...)
    pub games: BTreeMap<String, GameDetail>,
}

impl PlayerProfile {
    /// Get details for a game, if the player has registered it.
    pub fn game(&self, game_id: &str) -> Option<&GameDetail> {
        self.games.get(game_id)
    }
}

/// Lifetime statistics as returned by the API.
///
/// Keys and value types depend on the game, so both maps are left opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub player_id: PlayerId,
    pub game_id: String,

    #[serde(default)]
    pub lifetime: Map<String, Value>,

    #[serde(default)]
    pub segments: Vec<Map<String, Value>>,
}

impl LifetimeStats {
    pub fn is_empty(&self) -> bool {
        self.lifetime.is_empty()
    }

    /// Extract the headline figures, trying the known key spellings in order.
    pub fn summary(&self) -> LifetimeSummary {
        LifetimeSummary {
            kd_ratio: first_number(&self.lifetime, KD_KEYS).unwrap_or(0.0),
            matches: first_number(&self.lifetime, MATCH_KEYS)
                .map(|m| m as u32)
                .unwrap_or(0),
            win_rate: first_number(&self.lifetime, WIN_RATE_KEYS).unwrap_or(0.0),
        }
    }
}

const KD_KEYS: &[&str] = &["Average K/D Ratio", "K/D Ratio", "K/D", "KD Ratio", "Average KD", "KD"];

const MATCH_KEYS: &[&str] = &[
    "Matches",
    "Total Matches",
    "Games",
    "Total Games",
    "Matches Played",
    "Total Matches Played",
];

const WIN_RATE_KEYS: &[&str] = &[
    "Win Rate %",
    "Win Rate",
    "Win%",
    "Win Percentage",
    "Wins %",
    "Winrate %",
];

/// Headline lifetime figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeSummary {
    pub kd_ratio: f64,
    pub matches: u32,
    /// Percentage in [0, 100]
    pub win_rate: f64,
}

/// Return the first key whose value reads as a number.
fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(value_as_f64)
}

/// Read a JSON value that may be a number or a numeric string ("45", "45%").
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lifetime(value: Value) -> LifetimeStats {
        LifetimeStats {
            player_id: "p1".into(),
            game_id: "cs2".to_string(),
            lifetime: value.as_object().cloned().unwrap_or_default(),
            segments: Vec::new(),
        }
    }

    #[test]
    fn test_value_as_f64() {
        assert_eq!(value_as_f64(&json!(1.25)), Some(1.25));
        assert_eq!(value_as_f64(&json!(12)), Some(12.0));
        assert_eq!(value_as_f64(&json!("45")), Some(45.0));
        assert_eq!(value_as_f64(&json!("52%")), Some(52.0));
        assert_eq!(value_as_f64(&json!("n/a")), None);
        assert_eq!(value_as_f64(&json!(null)), None);
    }

    #[test]
    fn test_lifetime_summary_string_values() {
        let stats = lifetime(json!({
            "Average K/D Ratio": "1.12",
            "Matches": "842",
            "Win Rate %": "53"
        }));

        let summary = stats.summary();
        assert_eq!(summary.kd_ratio, 1.12);
        assert_eq!(summary.matches, 842);
        assert_eq!(summary.win_rate, 53.0);
    }

    #[test]
    fn test_lifetime_summary_key_fallback() {
        let stats = lifetime(json!({
            "K/D Ratio": 0.95,
            "Total Matches": 10,
            "Winrate %": 40.5
        }));

        let summary = stats.summary();
        assert_eq!(summary.kd_ratio, 0.95);
        assert_eq!(summary.matches, 10);
        assert_eq!(summary.win_rate, 40.5);
    }

    #[test]
    fn test_lifetime_summary_skips_unparseable_key() {
        // First key is present but junk, the next spelling is used
        let stats = lifetime(json!({
            "Average K/D Ratio": "-",
            "K/D": "1.4"
        }));
        assert_eq!(stats.summary().kd_ratio, 1.4);
    }

    #[test]
    fn test_lifetime_summary_empty() {
        let stats = LifetimeStats::default();
        assert!(stats.is_empty());
        assert_eq!(stats.summary(), LifetimeSummary::default());
    }

    #[test]
    fn test_profile_game_lookup() {
        let mut profile = PlayerProfile::default();
        profile.games.insert(
            "cs2".to_string(),
            GameDetail {
                elo: 2100,
                skill_level: 10,
                region: "EU".to_string(),
            },
        );

        assert_eq!(profile.game("cs2").map(|g| g.elo), Some(2100));
        assert!(profile.game("dota2").is_none());
    }
}
