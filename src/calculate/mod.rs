//! Statistics calculation engine.
//!
//! Turns ordered match records into rolling statistics:
//! - Totals, rates and best/worst K/D over a match window
//! - Win/loss streaks (see [`streaks`])
//! - Estimated advanced metrics for a single match (see [`estimate`])
//! - Deltas between two players (see [`compare`])
//!
//! Everything here is pure and synchronous. Inputs are borrowed, outputs are
//! freshly allocated, and no function can fail.

pub mod compare;
pub mod estimate;
pub mod streaks;

pub use compare::compare;
pub use estimate::build_match_detail;
pub use streaks::compute_streaks;

use std::collections::BTreeMap;

use crate::models::{MatchRecord, StatsSummary};

/// Calculate win rate as a percentage. Zero matches yields 0.
pub fn calculate_win_rate(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Kill/death ratio with deaths = 0 read as K/D = kills.
pub fn calculate_kd_ratio(kills: u32, deaths: u32) -> f64 {
    if deaths > 0 {
        kills as f64 / deaths as f64
    } else {
        kills as f64
    }
}

/// Aggregate an ordered (newest-first) list of matches into a summary.
///
/// Matches with a zero K/D still appear in the K/D series but are left out of
/// the average, best and worst. The same goes for a zero headshot percentage.
pub fn aggregate(matches: &[MatchRecord]) -> StatsSummary {
    if matches.is_empty() {
        return StatsSummary::default();
    }

    let mut summary = StatsSummary {
        total_matches: matches.len() as u32,
        kd_series: Vec::with_capacity(matches.len()),
        ..Default::default()
    };

    let mut kd = RunningMean::default();
    let mut headshots = RunningMean::default();
    let mut best_kd: Option<f64> = None;
    let mut worst_kd: Option<f64> = None;

    for record in matches {
        summary.total_kills += record.kills;
        summary.total_deaths += record.deaths;
        summary.total_assists += record.assists;

        if record.result.is_win() {
            summary.wins += 1;
        } else {
            summary.losses += 1;
        }

        summary.kd_series.push(record.kd_ratio);
        if record.kd_ratio > 0.0 {
            kd.add(record.kd_ratio);
            best_kd = Some(best_kd.map_or(record.kd_ratio, |b| b.max(record.kd_ratio)));
            worst_kd = Some(worst_kd.map_or(record.kd_ratio, |w| w.min(record.kd_ratio)));
        }

        if record.headshot_pct > 0.0 {
            headshots.add(record.headshot_pct);
        }

        if !record.map.is_empty() {
            *summary.map_counts.entry(record.map.clone()).or_insert(0) += 1;
        }
    }

    summary.win_rate = calculate_win_rate(summary.wins, summary.total_matches);
    summary.average_kd = kd.mean();
    summary.total_kd = calculate_kd_ratio(summary.total_kills, summary.total_deaths);
    summary.average_headshot_pct = headshots.mean();
    summary.best_kd = best_kd.unwrap_or(0.0);
    summary.worst_kd = worst_kd.unwrap_or(0.0);
    summary.most_played_map = most_played_map(&summary.map_counts);

    let streaks = compute_streaks(matches);
    summary.current_streak = streaks.current;
    summary.streak_kind = streaks.kind;
    summary.longest_win_streak = streaks.longest_win;
    summary.longest_loss_streak = streaks.longest_loss;

    summary
}

/// Map with the highest count. Ties go to the name that sorts first.
pub fn most_played_map(map_counts: &BTreeMap<String, u32>) -> Option<String> {
    let mut best: Option<(&String, u32)> = None;
    for (name, &count) in map_counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.clone())
}

#[derive(Default)]
struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{MatchRecord, MatchResult};

    /// Record with the given result and K/D; other stats fixed.
    pub fn record(id: &str, result: MatchResult, kd_ratio: f64) -> MatchRecord {
        MatchRecord {
            match_id: id.into(),
            map: String::new(),
            finished_at: 0,
            score: String::new(),
            kills: 0,
            deaths: 0,
            assists: 0,
            kd_ratio,
            headshot_pct: 0.0,
            adr: 0.0,
            result,
        }
    }

    /// Records with the given results, newest first, K/D fixed at 1.0.
    pub fn records(results: &[MatchResult]) -> Vec<MatchRecord> {
        results
            .iter()
            .enumerate()
            .map(|(i, &r)| record(&format!("m{}", i), r, 1.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{record, records};
    use super::*;
    use crate::models::MatchResult::{Loss, Win};
    use crate::models::StreakKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_calculate_win_rate() {
        assert_eq!(calculate_win_rate(3, 5), 60.0);
        assert_eq!(calculate_win_rate(0, 0), 0.0);
        assert_eq!(calculate_win_rate(4, 4), 100.0);
    }

    #[test]
    fn test_calculate_kd_ratio() {
        assert_eq!(calculate_kd_ratio(20, 10), 2.0);
        assert_eq!(calculate_kd_ratio(7, 0), 7.0);
        assert_eq!(calculate_kd_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_aggregate_empty() {
        let summary = aggregate(&[]);

        assert_eq!(summary, StatsSummary::default());
        assert_eq!(summary.win_rate, 0.0);
        assert!(summary.kd_series.is_empty());
        assert!(summary.map_counts.is_empty());
        assert_eq!(summary.streak_kind, StreakKind::None);
    }

    #[test]
    fn test_aggregate_end_to_end() {
        let matches = records(&[Win, Win, Loss, Loss, Win]);
        let summary = aggregate(&matches);

        assert_eq!(summary.total_matches, 5);
        assert_eq!(summary.wins, 3);
        assert_eq!(summary.losses, 2);
        assert_eq!(summary.win_rate, 60.0);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.streak_kind, StreakKind::Win);
        assert_eq!(summary.longest_win_streak, 2);
        assert_eq!(summary.longest_loss_streak, 2);
    }

    #[test]
    fn test_aggregate_wins_plus_losses_is_total() {
        let matches = records(&[Loss, Win, Loss, Loss, Win, Win, Win, Loss]);
        let summary = aggregate(&matches);

        assert_eq!(summary.wins + summary.losses, matches.len() as u32);
        assert_eq!(summary.total_matches, matches.len() as u32);
    }

    #[test]
    fn test_aggregate_kd_series_matches_input() {
        let matches = vec![
            record("a", Win, 1.5),
            record("b", Loss, 0.0),
            record("c", Win, 1.2),
        ];
        let summary = aggregate(&matches);

        assert_eq!(summary.kd_series.len(), matches.len());
        for (i, m) in matches.iter().enumerate() {
            assert_eq!(summary.kd_series[i], m.kd_ratio);
        }
    }

    #[test]
    fn test_aggregate_average_kd_excludes_zero() {
        let matches = vec![
            record("a", Win, 1.5),
            record("b", Loss, 0.0),
            record("c", Win, 1.2),
        ];
        let summary = aggregate(&matches);

        assert!((summary.average_kd - 1.35).abs() < 1e-9);
        assert_eq!(summary.best_kd, 1.5);
        assert_eq!(summary.worst_kd, 1.2);
    }

    #[test]
    fn test_aggregate_best_worst_default_to_zero() {
        let matches = vec![record("a", Win, 0.0), record("b", Loss, 0.0)];
        let summary = aggregate(&matches);

        assert_eq!(summary.best_kd, 0.0);
        assert_eq!(summary.worst_kd, 0.0);
        assert_eq!(summary.average_kd, 0.0);
        assert_eq!(summary.kd_series, vec![0.0, 0.0]);
    }

    #[test]
    fn test_aggregate_totals_and_total_kd() {
        let mut a = record("a", Win, 2.0);
        a.kills = 20;
        a.deaths = 10;
        a.assists = 4;
        let mut b = record("b", Loss, 0.5);
        b.kills = 5;
        b.deaths = 10;
        b.assists = 1;

        let summary = aggregate(&[a, b]);

        assert_eq!(summary.total_kills, 25);
        assert_eq!(summary.total_deaths, 20);
        assert_eq!(summary.total_assists, 5);
        assert_eq!(summary.total_kd, 1.25);
    }

    #[test]
    fn test_aggregate_total_kd_without_deaths() {
        let mut a = record("a", Win, 12.0);
        a.kills = 12;
        let summary = aggregate(&[a]);

        assert_eq!(summary.total_kd, 12.0);
    }

    #[test]
    fn test_aggregate_headshot_average_excludes_zero() {
        let mut a = record("a", Win, 1.0);
        a.headshot_pct = 40.0;
        let b = record("b", Win, 1.0);
        let mut c = record("c", Win, 1.0);
        c.headshot_pct = 60.0;

        let summary = aggregate(&[a, b, c]);

        assert_eq!(summary.average_headshot_pct, 50.0);
    }

    #[test]
    fn test_aggregate_map_counts() {
        let maps = ["de_mirage", "", "de_inferno", "de_mirage", "de_nuke"];
        let matches: Vec<_> = maps
            .iter()
            .enumerate()
            .map(|(i, map)| {
                let mut r = record(&i.to_string(), Win, 1.0);
                r.map = map.to_string();
                r
            })
            .collect();

        let summary = aggregate(&matches);

        assert_eq!(summary.map_counts.len(), 3);
        assert_eq!(summary.map_counts["de_mirage"], 2);
        assert_eq!(summary.map_counts["de_inferno"], 1);
        assert_eq!(summary.most_played_map.as_deref(), Some("de_mirage"));
    }

    #[test]
    fn test_most_played_map_tie_breaks_by_name() {
        let mut counts = BTreeMap::new();
        counts.insert("de_vertigo".to_string(), 3);
        counts.insert("de_ancient".to_string(), 3);
        counts.insert("de_anubis".to_string(), 1);

        assert_eq!(most_played_map(&counts).as_deref(), Some("de_ancient"));
        assert_eq!(most_played_map(&BTreeMap::new()), None);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let mut matches = records(&[Win, Loss, Loss, Win]);
        matches[0].map = "de_dust2".to_string();
        matches[1].map = "de_mirage".to_string();
        matches[2].headshot_pct = 33.3;

        assert_eq!(aggregate(&matches), aggregate(&matches));
    }
}
