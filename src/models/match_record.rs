//! Per-match outcome for a single player.

use serde::{Deserialize, Serialize};

use super::MatchId;

/// Outcome of a match from the player's point of view.
///
/// Ties are not modelled: the provider either resolves a winner or drops
/// the record. Any label other than `"Win"` reads as a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    /// Classify a result label. Only the exact label `"Win"` is a win.
    pub fn from_label(label: &str) -> Self {
        if label == "Win" {
            MatchResult::Win
        } else {
            MatchResult::Loss
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, MatchResult::Win)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Win => "Win",
            MatchResult::Loss => "Loss",
        }
    }
}

impl From<String> for MatchResult {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<MatchResult> for String {
    fn from(result: MatchResult) -> Self {
        result.as_str().to_string()
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One player's performance in one completed match.
///
/// Built by the stats provider and never mutated afterwards. Zero in a
/// numeric field means the value was unavailable upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,

    /// Map name, empty when unknown
    #[serde(default)]
    pub map: String,

    /// Completion time in seconds since the epoch, 0 when unknown
    #[serde(default)]
    pub finished_at: i64,

    /// Final score formatted as "A-B", empty when unknown
    #[serde(default)]
    pub score: String,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    /// Kill/death ratio, 0 when undefined
    #[serde(default)]
    pub kd_ratio: f64,

    /// Headshot percentage in [0, 100], 0 when unknown
    #[serde(default)]
    pub headshot_pct: f64,

    /// Average damage per round, 0 when unknown
    #[serde(default)]
    pub adr: f64,

    pub result: MatchResult,
}

impl MatchRecord {
    /// Split the score into its two halves, in the order they are written.
    ///
    /// See [`parse_score`] for how malformed halves are treated.
    pub fn score_parts(&self) -> Option<(u32, u32)> {
        parse_score(&self.score)
    }
}

/// Parse a "A-B" score string. Whitespace around each half is ignored.
///
/// Each half is read on its own and reads as 0 when it is not a number.
/// Returns `None` when there is no `-` or neither half parses.
pub fn parse_score(score: &str) -> Option<(u32, u32)> {
    let mut parts = score.split('-');
    let first = parts.next()?.trim().parse::<u32>().ok();
    let second = parts.next()?.trim().parse::<u32>().ok();
    if first.is_none() && second.is_none() {
        return None;
    }
    Some((first.unwrap_or(0), second.unwrap_or(0)))
}
