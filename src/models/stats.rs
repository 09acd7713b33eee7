//! Aggregate statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which kind of run the current streak is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    #[default]
    None,
}

impl std::fmt::Display for StreakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreakKind::Win => write!(f, "win"),
            StreakKind::Loss => write!(f, "loss"),
            StreakKind::None => write!(f, "none"),
        }
    }
}

/// Streak figures over an ordered (newest-first) match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    /// Positive for a win streak, negative for a loss streak, 0 for none
    pub current: i32,
    pub kind: StreakKind,
    pub longest_win: u32,
    pub longest_loss: u32,
}

/// Aggregate over an ordered list of match records (newest first).
///
/// `wins + losses == total_matches` and `kd_series.len() == total_matches`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,

    /// Percentage in [0, 100]
    pub win_rate: f64,

    pub total_kills: u32,
    pub total_deaths: u32,
    pub total_assists: u32,

    /// Mean of the per-match ratios that are above zero
    pub average_kd: f64,

    /// Total kills over total deaths (total kills when there are no deaths)
    pub total_kd: f64,

    /// Mean of the per-match headshot percentages that are above zero
    pub average_headshot_pct: f64,

    pub best_kd: f64,
    pub worst_kd: f64,

    pub most_played_map: Option<String>,

    /// Matches per map name
    pub map_counts: BTreeMap<String, u32>,

    /// Per-match K/D in match order, index 0 most recent
    pub kd_series: Vec<f64>,

    pub current_streak: i32,
    pub streak_kind: StreakKind,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
}

impl StatsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    pub fn streaks(&self) -> Streaks {
        Streaks {
            current: self.current_streak,
            kind: self.streak_kind,
            longest_win: self.longest_win_streak,
            longest_loss: self.longest_loss_streak,
        }
    }
}

/// Delta between two summaries: every numeric field is `a - b`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub average_kd_diff: f64,
    pub total_kd_diff: f64,
    pub win_rate_diff: f64,
    pub average_headshot_diff: f64,
    pub total_kills_diff: i64,
    pub total_deaths_diff: i64,
    pub total_assists_diff: i64,
    pub best_kd_diff: f64,
    pub worst_kd_diff: f64,

    /// Common map with the highest combined match count
    pub most_played_together: Option<String>,

    /// Maps both players have played, sorted by name
    pub common_maps: Vec<String>,
}

/// Shown in place of the most played common map when there is none.
pub const NO_COMMON_MAPS: &str = "No common maps";

impl ComparisonResult {
    pub fn most_played_together_label(&self) -> &str {
        self.most_played_together.as_deref().unwrap_or(NO_COMMON_MAPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_kind_display() {
        assert_eq!(format!("{}", StreakKind::Win), "win");
        assert_eq!(format!("{}", StreakKind::Loss), "loss");
        assert_eq!(format!("{}", StreakKind::None), "none");
    }

    #[test]
    fn test_streak_kind_serialization() {
        let json = serde_json::to_string(&StreakKind::Loss).unwrap();
        assert_eq!(json, "\"loss\"");
    }

    #[test]
    fn test_default_summary_is_empty() {
        let summary = StatsSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.streaks(), Streaks::default());
        assert_eq!(summary.streak_kind, StreakKind::None);
    }

    #[test]
    fn test_most_played_together_label() {
        let mut result = ComparisonResult::default();
        assert_eq!(result.most_played_together_label(), "No common maps");

        result.most_played_together = Some("de_mirage".to_string());
        assert_eq!(result.most_played_together_label(), "de_mirage");
    }
}
