//! Conversion from API response shapes to domain models.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::wire::{HistoryItem, MatchResponse, MatchStatsResponse, RoundTeam};
use crate::calculate::calculate_kd_ratio;
use crate::models::{
    value_as_f64, MatchRecord, MatchResult, MatchScoreboard, ScoreboardPlayer, TeamScoreboard,
};

const HEADSHOT_PCT_KEYS: &[&str] = &["Headshots %", "HS %"];
const ADR_KEYS: &[&str] = &["Average Damage per Round", "ADR", "Avg Damage"];

/// Faction key whose roster contains the player.
pub(crate) fn player_faction<'a>(item: &'a HistoryItem, player_id: &str) -> Option<&'a str> {
    item.teams
        .iter()
        .find(|(_, faction)| faction.players.iter().any(|p| p.player_id == player_id))
        .map(|(key, _)| key.as_str())
}

/// Win only when the player's faction is the declared winner.
pub(crate) fn match_result(item: &HistoryItem, player_id: &str) -> MatchResult {
    let winner = item.results.as_ref().map(|r| r.winner.as_str());
    match (player_faction(item, player_id), winner) {
        (Some(faction), Some(winner)) if faction == winner => MatchResult::Win,
        _ => MatchResult::Loss,
    }
}

/// Faction scores ordered by faction id and joined with "-".
pub(crate) fn format_score(score: &HashMap<String, i64>) -> String {
    let mut factions: Vec<_> = score.iter().collect();
    factions.sort_by(|a, b| a.0.cmp(b.0));
    factions
        .iter()
        .map(|(_, points)| points.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// `game_mode` carries the map on some queues; "5v5" and blank fall back to
/// the round stats.
pub(crate) fn map_name(item: &HistoryItem, stats: Option<&MatchStatsResponse>) -> String {
    if !item.game_mode.is_empty() && item.game_mode != "5v5" {
        return item.game_mode.clone();
    }
    stats
        .and_then(|s| s.rounds.first())
        .and_then(|round| round.round_stats.get("Map"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A player's figures summed across every round of a match.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PlayerLine {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshot_pct: f64,
    pub adr: f64,
}

/// Sum a player's stats over all rounds. `None` if the player never appears.
pub(crate) fn player_line(stats: &MatchStatsResponse, player_id: &str) -> Option<PlayerLine> {
    let mut line = PlayerLine::default();
    let mut found = false;
    let mut headshot_kills = 0.0;
    let mut adr_total = 0.0;
    let mut adr_rounds = 0u32;

    for round in &stats.rounds {
        let player = round
            .teams
            .iter()
            .flat_map(|team| team.players.iter())
            .find(|p| p.player_id == player_id);
        let Some(player) = player else {
            continue;
        };
        found = true;

        let stats = &player.player_stats;
        let kills = stat_u32(stats, "Kills");
        line.kills += kills;
        line.deaths += stat_u32(stats, "Deaths");
        line.assists += stat_u32(stats, "Assists");

        if let Some(pct) = first_stat(stats, HEADSHOT_PCT_KEYS) {
            headshot_kills += kills as f64 * pct / 100.0;
        } else if let Some(count) = first_stat(stats, &["Headshots"]) {
            headshot_kills += count;
        }

        if let Some(adr) = first_stat(stats, ADR_KEYS) {
            adr_total += adr;
            adr_rounds += 1;
        }
    }

    if !found {
        return None;
    }
    if line.kills > 0 {
        line.headshot_pct = headshot_kills / line.kills as f64 * 100.0;
    }
    if adr_rounds > 0 {
        line.adr = adr_total / adr_rounds as f64;
    }
    Some(line)
}

/// Build the record for one history entry. Missing stats leave the numeric
/// fields at zero.
pub(crate) fn match_record(
    item: &HistoryItem,
    player_id: &str,
    stats: Option<&MatchStatsResponse>,
) -> MatchRecord {
    let line = stats
        .and_then(|s| player_line(s, player_id))
        .unwrap_or_default();

    MatchRecord {
        match_id: item.match_id.as_str().into(),
        map: map_name(item, stats),
        finished_at: item.finished_at,
        score: item
            .results
            .as_ref()
            .map(|r| format_score(&r.score))
            .unwrap_or_default(),
        kills: line.kills,
        deaths: line.deaths,
        assists: line.assists,
        kd_ratio: calculate_kd_ratio(line.kills, line.deaths),
        headshot_pct: line.headshot_pct,
        adr: line.adr,
        result: match_result(item, player_id),
    }
}

/// Scoreboard from the first round of a match's stats.
pub(crate) fn scoreboard(details: &MatchResponse, stats: &MatchStatsResponse) -> MatchScoreboard {
    let Some(round) = stats.rounds.first() else {
        return MatchScoreboard::without_stats(
            details.match_id.as_str().into(),
            details.finished_at,
            details.status.clone(),
        );
    };

    let map = round
        .round_stats
        .get("Map")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("Unknown")
        .to_string();

    let score = round
        .round_stats
        .get("Score")
        .and_then(Value::as_str)
        .map(|s| s.split('/').map(str::trim).collect::<Vec<_>>().join("-"))
        .unwrap_or_else(|| "N/A".to_string());

    MatchScoreboard {
        match_id: details.match_id.as_str().into(),
        map,
        finished_at: details.finished_at,
        score,
        status: details.status.clone(),
        teams: round.teams.iter().take(2).map(team_scoreboard).collect(),
    }
}

fn team_scoreboard(team: &RoundTeam) -> TeamScoreboard {
    let players = team
        .players
        .iter()
        .map(|p| {
            let stats = &p.player_stats;
            let kills = stat_u32(stats, "Kills");
            let deaths = stat_u32(stats, "Deaths");
            ScoreboardPlayer {
                player_id: p.player_id.as_str().into(),
                nickname: p.nickname.clone(),
                kills,
                deaths,
                assists: stat_u32(stats, "Assists"),
                kd_ratio: calculate_kd_ratio(kills, deaths),
                headshot_pct: first_stat(stats, HEADSHOT_PCT_KEYS).unwrap_or(0.0),
                adr: first_stat(stats, ADR_KEYS).unwrap_or(0.0),
            }
        })
        .collect();

    TeamScoreboard {
        name: team
            .team_stats
            .get("Team")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        score: stat_u32(&team.team_stats, "Final Score"),
        players,
    }
}

fn first_stat(stats: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| stats.get(*key))
        .find_map(value_as_f64)
}

fn stat_u32(stats: &Map<String, Value>, key: &str) -> u32 {
    stats
        .get(key)
        .and_then(value_as_f64)
        .filter(|v| *v > 0.0)
        .map(|v| v as u32)
        .unwrap_or(0)
}
