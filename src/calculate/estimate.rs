//! Estimated advanced metrics for a single match.
//!
//! The API does not report these figures. Every function here is a fixed
//! heuristic over kills, deaths, assists, K/D, HS% and result; none of them is
//! measured telemetry. The scaling constants and the truncation to integers
//! are kept exactly as shipped so that displayed numbers stay stable.
//!
//! Rating uses the uncapped formula `kd*0.5 + hs/100*0.3 + adr/100*0.2`,
//! floored at zero. The older capped variant is not used anywhere.
//!
//! Nothing in this module feeds back into [`crate::calculate::aggregate`].

use crate::models::{
    AdvancedStats, MatchDetail, MatchRecord, PerformanceScores, TeamScore,
};

/// Round count assumed when ADR has to be estimated.
pub const ASSUMED_ROUNDS: f64 = 30.0;

/// ADR as reported, or `(kills*100 + assists*50) / 30` when missing.
pub fn estimate_adr(record: &MatchRecord) -> f64 {
    if record.adr > 0.0 {
        return record.adr;
    }
    let damage = record.kills as f64 * 100.0 + record.assists as f64 * 50.0;
    damage / ASSUMED_ROUNDS
}

/// HLTV-style rating. Floored at 0, no upper cap.
pub fn estimate_rating(record: &MatchRecord) -> f64 {
    let kd_component = record.kd_ratio * 0.5;
    let hs_component = record.headshot_pct / 100.0 * 0.3;
    let adr_component = estimate_adr(record) / 100.0 * 0.2;

    (kd_component + hs_component + adr_component).max(0.0)
}

pub fn estimate_first_kills(record: &MatchRecord) -> u32 {
    (record.kills as f64 * 0.3) as u32
}

pub fn estimate_first_deaths(record: &MatchRecord) -> u32 {
    (record.deaths as f64 * 0.2) as u32
}

/// Only won matches with K/D above 1.0 get clutch wins.
pub fn estimate_clutch_wins(record: &MatchRecord) -> u32 {
    if record.result.is_win() && record.kd_ratio > 1.0 {
        (record.kills as f64 * 0.1) as u32
    } else {
        0
    }
}

pub fn estimate_entry_frags(record: &MatchRecord) -> u32 {
    (record.kills as f64 * 0.25) as u32
}

pub fn estimate_flash_assists(record: &MatchRecord) -> u32 {
    (record.assists as f64 * 0.4) as u32
}

pub fn estimate_utility_damage(record: &MatchRecord) -> u32 {
    (record.assists as f64 * 20.0 + record.kills as f64 * 5.0) as u32
}

/// Step function on K/D.
pub fn consistency_score(record: &MatchRecord) -> f64 {
    let kd = record.kd_ratio;
    if kd >= 1.5 {
        90.0
    } else if kd >= 1.2 {
        80.0
    } else if kd >= 1.0 {
        70.0
    } else if kd >= 0.8 {
        60.0
    } else {
        50.0
    }
}

pub fn impact_score(record: &MatchRecord) -> f64 {
    record.kd_ratio * 40.0 + record.headshot_pct * 0.6
}

/// `kd*30` for won matches with K/D above 1.0, otherwise a flat 20.
pub fn clutch_score(record: &MatchRecord) -> f64 {
    if record.result.is_win() && record.kd_ratio > 1.0 {
        record.kd_ratio * 30.0
    } else {
        20.0
    }
}

pub fn entry_score(record: &MatchRecord) -> f64 {
    record.kills as f64 * record.kd_ratio * 2.0
}

pub fn support_score(record: &MatchRecord) -> f64 {
    record.assists as f64 * 15.0
}

/// Enrich a match record for the drill-down view.
pub fn build_match_detail(record: &MatchRecord) -> MatchDetail {
    let (player_team, enemy_team) = record.score_parts().unwrap_or((0, 0));

    MatchDetail {
        match_id: record.match_id.clone(),
        map: record.map.clone(),
        finished_at: record.finished_at,
        score: record.score.clone(),
        result: record.result,
        player: AdvancedStats {
            kills: record.kills,
            deaths: record.deaths,
            assists: record.assists,
            kd_ratio: record.kd_ratio,
            headshot_pct: record.headshot_pct,
            adr: estimate_adr(record),
            rating: estimate_rating(record),
            first_kills: estimate_first_kills(record),
            first_deaths: estimate_first_deaths(record),
            clutch_wins: estimate_clutch_wins(record),
            entry_frags: estimate_entry_frags(record),
            flash_assists: estimate_flash_assists(record),
            utility_damage: estimate_utility_damage(record),
        },
        team_score: TeamScore {
            player_team,
            enemy_team,
        },
        performance: PerformanceScores {
            consistency: consistency_score(record),
            impact: impact_score(record),
            clutch: clutch_score(record),
            entry: entry_score(record),
            support: support_score(record),
        },
    }
}
