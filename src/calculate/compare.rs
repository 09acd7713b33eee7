//! Head-to-head delta between two players' summaries.

use crate::models::{ComparisonResult, StatsSummary};

/// Compare two summaries. Every numeric field is `a - b`.
pub fn compare(a: &StatsSummary, b: &StatsSummary) -> ComparisonResult {
    let common_maps = common_maps(a, b);
    let most_played_together = most_played_together(a, b, &common_maps);

    ComparisonResult {
        average_kd_diff: a.average_kd - b.average_kd,
        total_kd_diff: a.total_kd - b.total_kd,
        win_rate_diff: a.win_rate - b.win_rate,
        average_headshot_diff: a.average_headshot_pct - b.average_headshot_pct,
        total_kills_diff: i64::from(a.total_kills) - i64::from(b.total_kills),
        total_deaths_diff: i64::from(a.total_deaths) - i64::from(b.total_deaths),
        total_assists_diff: i64::from(a.total_assists) - i64::from(b.total_assists),
        best_kd_diff: a.best_kd - b.best_kd,
        worst_kd_diff: a.worst_kd - b.worst_kd,
        most_played_together,
        common_maps,
    }
}

/// Maps present in both players' map counts, sorted by name.
pub fn common_maps(a: &StatsSummary, b: &StatsSummary) -> Vec<String> {
    a.map_counts
        .keys()
        .filter(|name| b.map_counts.contains_key(*name))
        .cloned()
        .collect()
}

/// Common map with the highest combined count. Ties go to the name that
/// sorts first.
fn most_played_together(
    a: &StatsSummary,
    b: &StatsSummary,
    common_maps: &[String],
) -> Option<String> {
    let mut best: Option<(&String, u32)> = None;
    for name in common_maps {
        let combined = a.map_counts.get(name).copied().unwrap_or(0)
            + b.map_counts.get(name).copied().unwrap_or(0);
        if best.map_or(true, |(_, top)| combined > top) {
            best = Some((name, combined));
        }
    }
    best.map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary_with_maps(maps: &[(&str, u32)]) -> StatsSummary {
        StatsSummary {
            map_counts: maps.iter().map(|(m, c)| (m.to_string(), *c)).collect(),
            ..Default::default()
        }
    }

    fn player_a() -> StatsSummary {
        StatsSummary {
            total_matches: 20,
            wins: 12,
            losses: 8,
            win_rate: 60.0,
            total_kills: 400,
            total_deaths: 320,
            total_assists: 90,
            average_kd: 1.3,
            total_kd: 1.25,
            average_headshot_pct: 48.0,
            best_kd: 2.4,
            worst_kd: 0.6,
            ..summary_with_maps(&[("de_mirage", 8), ("de_inferno", 5), ("de_nuke", 7)])
        }
    }

    fn player_b() -> StatsSummary {
        StatsSummary {
            total_matches: 20,
            wins: 9,
            losses: 11,
            win_rate: 45.0,
            total_kills: 350,
            total_deaths: 360,
            total_assists: 110,
            average_kd: 0.98,
            total_kd: 0.97,
            average_headshot_pct: 41.5,
            best_kd: 1.9,
            worst_kd: 0.4,
            ..summary_with_maps(&[("de_inferno", 9), ("de_nuke", 2), ("de_ancient", 9)])
        }
    }

    #[test]
    fn test_compare_diffs() {
        let result = compare(&player_a(), &player_b());

        assert!((result.average_kd_diff - 0.32).abs() < 1e-9);
        assert!((result.total_kd_diff - 0.28).abs() < 1e-9);
        assert_eq!(result.win_rate_diff, 15.0);
        assert_eq!(result.average_headshot_diff, 6.5);
        assert_eq!(result.total_kills_diff, 50);
        assert_eq!(result.total_deaths_diff, -40);
        assert_eq!(result.total_assists_diff, -20);
        assert!((result.best_kd_diff - 0.5).abs() < 1e-9);
        assert!((result.worst_kd_diff - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_common_maps_and_most_played_together() {
        let result = compare(&player_a(), &player_b());

        assert_eq!(result.common_maps, vec!["de_inferno", "de_nuke"]);
        // inferno 5+9 beats nuke 7+2
        assert_eq!(result.most_played_together.as_deref(), Some("de_inferno"));
    }

    #[test]
    fn test_most_played_together_tie_breaks_by_name() {
        let a = summary_with_maps(&[("de_overpass", 3), ("de_anubis", 2)]);
        let b = summary_with_maps(&[("de_overpass", 1), ("de_anubis", 2)]);

        let result = compare(&a, &b);
        assert_eq!(result.most_played_together.as_deref(), Some("de_anubis"));
    }

    #[test]
    fn test_no_common_maps() {
        let a = summary_with_maps(&[("de_dust2", 4)]);
        let b = summary_with_maps(&[("de_train", 4)]);

        let result = compare(&a, &b);
        assert!(result.common_maps.is_empty());
        assert_eq!(result.most_played_together, None);
        assert_eq!(result.most_played_together_label(), "No common maps");
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let (a, b) = (player_a(), player_b());
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);

        assert_eq!(ab.average_kd_diff, -ba.average_kd_diff);
        assert_eq!(ab.total_kd_diff, -ba.total_kd_diff);
        assert_eq!(ab.win_rate_diff, -ba.win_rate_diff);
        assert_eq!(ab.total_kills_diff, -ba.total_kills_diff);
        assert_eq!(ab.common_maps, ba.common_maps);
        assert_eq!(ab.most_played_together, ba.most_played_together);
    }

    #[test]
    fn test_compare_empty_summaries() {
        let result = compare(&StatsSummary::default(), &StatsSummary::default());
        assert_eq!(result, ComparisonResult::default());
    }
}
