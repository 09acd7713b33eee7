//! Plain-text reports for the terminal.
//!
//! Every function returns a `String`; callers decide where it goes.

mod chart;

pub use chart::{kd_chart, CHART_HEIGHT, CHART_WIDTH};

use chrono::DateTime;

use crate::app::PlayerComparison;
use crate::models::{
    ComparisonResult, LifetimeStats, MatchDetail, MatchRecord, MatchScoreboard, PlayerProfile,
    StatsSummary, StreakKind,
};

/// Timestamp as "YYYY-MM-DD HH:MM" UTC, "Unknown" for 0.
pub fn format_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return "Unknown".to_string();
    }
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "Unknown"
    } else {
        value
    }
}

pub fn profile(player: &PlayerProfile, game: &str) -> String {
    let mut lines = vec![
        format!("Player:   {}", player.nickname),
        format!("ID:       {}", player.id),
        format!("Country:  {}", or_unknown(&player.country.to_uppercase())),
    ];
    match player.game(game) {
        Some(detail) => {
            lines.push(format!("Game:     {}", game));
            lines.push(format!("ELO:      {}", detail.elo));
            lines.push(format!("Level:    {}", detail.skill_level));
            lines.push(format!("Region:   {}", or_unknown(&detail.region)));
        }
        None => lines.push(format!("Game:     {} (not registered)", game)),
    }
    if !player.faceit_url.is_empty() {
        lines.push(format!("Profile:  {}", player.faceit_url.replace("{lang}", "en")));
    }
    lines.join("\n")
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// One page of the match list. `page` is 0-based and clamped to the last page.
pub fn match_page(matches: &[MatchRecord], page: usize, per_page: usize) -> String {
    if matches.is_empty() {
        return "No matches found".to_string();
    }
    let per_page = per_page.max(1);
    let pages = page_count(matches.len(), per_page);
    let page = page.min(pages - 1);
    let start = page * per_page;
    let end = (start + per_page).min(matches.len());

    let mut lines = vec![
        format!(
            "Matches {}-{} of {} (page {}/{})",
            start + 1,
            end,
            matches.len(),
            page + 1,
            pages
        ),
        format!(
            "{:>3}  {:<16}  {:<12}  {:<7}  {:<4}  {:>8}  {:>5}  {:>5}  {:>5}",
            "#", "Date", "Map", "Score", "Res", "K/D/A", "K/D", "HS%", "ADR"
        ),
    ];
    for (i, record) in matches[start..end].iter().enumerate() {
        lines.push(format!(
            "{:>3}  {:<16}  {:<12}  {:<7}  {:<4}  {:>8}  {:>5.2}  {:>5.1}  {:>5.1}",
            start + i + 1,
            format_timestamp(record.finished_at),
            or_unknown(&record.map),
            or_unknown(&record.score),
            if record.result.is_win() { "W" } else { "L" },
            format!("{}/{}/{}", record.kills, record.deaths, record.assists),
            record.kd_ratio,
            record.headshot_pct,
            record.adr,
        ));
    }
    lines.join("\n")
}

/// Current and longest streak lines.
pub fn streak_block(stats: &StatsSummary) -> String {
    let streaks = stats.streaks();
    let current = match streaks.kind {
        StreakKind::Win => format!("Win Streak: {}", streaks.current.unsigned_abs()),
        StreakKind::Loss => format!("Loss Streak: {}", streaks.current.unsigned_abs()),
        StreakKind::None => "No active streak".to_string(),
    };
    [
        current,
        format!("Longest Win Streak: {}", streaks.longest_win),
        format!("Longest Loss Streak: {}", streaks.longest_loss),
    ]
    .join("\n")
}

pub fn stats(nickname: &str, stats: &StatsSummary) -> String {
    if stats.is_empty() {
        return format!("No matches found for {}", nickname);
    }

    let mut lines = vec![
        format!("Last {} matches for {}", stats.total_matches, nickname),
        String::new(),
        format!(
            "Wins / Losses:   {} / {} ({:.1}%)",
            stats.wins, stats.losses, stats.win_rate
        ),
        format!(
            "K / D / A:       {} / {} / {}",
            stats.total_kills, stats.total_deaths, stats.total_assists
        ),
        format!("Average K/D:     {:.2}", stats.average_kd),
        format!("Overall K/D:     {:.2}", stats.total_kd),
        format!(
            "Best / Worst:    {:.2} / {:.2}",
            stats.best_kd, stats.worst_kd
        ),
        format!("Average HS%:     {:.1}", stats.average_headshot_pct),
        format!(
            "Most played map: {}",
            stats.most_played_map.as_deref().unwrap_or("Unknown")
        ),
        String::new(),
        streak_block(stats),
    ];

    if !stats.map_counts.is_empty() {
        lines.push(String::new());
        lines.push("Maps:".to_string());
        let mut maps: Vec<_> = stats.map_counts.iter().collect();
        maps.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (map, count) in maps {
            lines.push(format!("  {:<14} {}", map, count));
        }
    }

    lines.push(String::new());
    lines.push(kd_chart(&stats.kd_series, CHART_WIDTH, CHART_HEIGHT));
    lines.join("\n")
}

pub fn match_detail(detail: &MatchDetail) -> String {
    let player = &detail.player;
    let perf = &detail.performance;
    [
        format!("Match {}", detail.match_id),
        format!(
            "{} on {} ({}) at {}",
            detail.result,
            or_unknown(&detail.map),
            or_unknown(&detail.score),
            format_timestamp(detail.finished_at)
        ),
        format!(
            "Team score: {} - {}",
            detail.team_score.player_team, detail.team_score.enemy_team
        ),
        String::new(),
        format!(
            "K / D / A:        {} / {} / {}",
            player.kills, player.deaths, player.assists
        ),
        format!("K/D:              {:.2}", player.kd_ratio),
        format!("HS%:              {:.1}", player.headshot_pct),
        format!("ADR:              {:.1}", player.adr),
        format!("Rating:           {:.2}", player.rating),
        String::new(),
        "Estimated:".to_string(),
        format!("  First kills:    {}", player.first_kills),
        format!("  First deaths:   {}", player.first_deaths),
        format!("  Clutch wins:    {}", player.clutch_wins),
        format!("  Entry frags:    {}", player.entry_frags),
        format!("  Flash assists:  {}", player.flash_assists),
        format!("  Utility damage: {}", player.utility_damage),
        String::new(),
        "Performance:".to_string(),
        format!("  Consistency:    {:.0}", perf.consistency),
        format!("  Impact:         {:.1}", perf.impact),
        format!("  Clutch:         {:.1}", perf.clutch),
        format!("  Entry:          {:.1}", perf.entry),
        format!("  Support:        {:.1}", perf.support),
    ]
    .join("\n")
}

/// Marker for a delta from player A's point of view.
fn verdict(diff: f64, lower_is_better: bool) -> &'static str {
    let diff = if lower_is_better { -diff } else { diff };
    if diff > 0.0 {
        "better"
    } else if diff < 0.0 {
        "worse"
    } else {
        "even"
    }
}

pub fn comparison(comparison: &PlayerComparison) -> String {
    let a = &comparison.a;
    let b = &comparison.b;
    let r: &ComparisonResult = &comparison.result;
    let name_a = &a.profile.nickname;
    let name_b = &b.profile.nickname;

    let row = |label: &str, va: String, vb: String, diff: String, mark: &str| {
        format!("{:<14} {:>10} {:>10} {:>9}  {}", label, va, vb, diff, mark)
    };

    let mut lines = vec![
        format!(
            "{} vs {} (last {} / {} matches)",
            name_a, name_b, a.stats.total_matches, b.stats.total_matches
        ),
        String::new(),
        format!("{:<14} {:>10} {:>10} {:>9}", "", name_a, name_b, "diff"),
        row(
            "Average K/D",
            format!("{:.2}", a.stats.average_kd),
            format!("{:.2}", b.stats.average_kd),
            format!("{:+.2}", r.average_kd_diff),
            verdict(r.average_kd_diff, false),
        ),
        row(
            "Overall K/D",
            format!("{:.2}", a.stats.total_kd),
            format!("{:.2}", b.stats.total_kd),
            format!("{:+.2}", r.total_kd_diff),
            verdict(r.total_kd_diff, false),
        ),
        row(
            "Win rate %",
            format!("{:.1}", a.stats.win_rate),
            format!("{:.1}", b.stats.win_rate),
            format!("{:+.1}", r.win_rate_diff),
            verdict(r.win_rate_diff, false),
        ),
        row(
            "Average HS%",
            format!("{:.1}", a.stats.average_headshot_pct),
            format!("{:.1}", b.stats.average_headshot_pct),
            format!("{:+.1}", r.average_headshot_diff),
            verdict(r.average_headshot_diff, false),
        ),
        row(
            "Kills",
            a.stats.total_kills.to_string(),
            b.stats.total_kills.to_string(),
            format!("{:+}", r.total_kills_diff),
            verdict(r.total_kills_diff as f64, false),
        ),
        row(
            "Deaths",
            a.stats.total_deaths.to_string(),
            b.stats.total_deaths.to_string(),
            format!("{:+}", r.total_deaths_diff),
            verdict(r.total_deaths_diff as f64, true),
        ),
        row(
            "Assists",
            a.stats.total_assists.to_string(),
            b.stats.total_assists.to_string(),
            format!("{:+}", r.total_assists_diff),
            verdict(r.total_assists_diff as f64, false),
        ),
        row(
            "Best K/D",
            format!("{:.2}", a.stats.best_kd),
            format!("{:.2}", b.stats.best_kd),
            format!("{:+.2}", r.best_kd_diff),
            verdict(r.best_kd_diff, false),
        ),
        row(
            "Worst K/D",
            format!("{:.2}", a.stats.worst_kd),
            format!("{:.2}", b.stats.worst_kd),
            format!("{:+.2}", r.worst_kd_diff),
            verdict(r.worst_kd_diff, false),
        ),
        String::new(),
        format!("Most played together: {}", r.most_played_together_label()),
    ];
    if !r.common_maps.is_empty() {
        lines.push(format!("Common maps: {}", r.common_maps.join(", ")));
    }
    lines.join("\n")
}

pub fn lifetime(nickname: &str, stats: &LifetimeStats) -> String {
    if stats.is_empty() {
        return format!("No lifetime stats for {}", nickname);
    }
    let summary = stats.summary();
    let mut lines = vec![
        format!("Lifetime {} stats for {}", stats.game_id, nickname),
        format!("Matches:   {}", summary.matches),
        format!("K/D:       {:.2}", summary.kd_ratio),
        format!("Win rate:  {:.1}%", summary.win_rate),
    ];
    if !stats.segments.is_empty() {
        lines.push(format!("Segments:  {}", stats.segments.len()));
    }
    lines.join("\n")
}

pub fn scoreboard(board: &MatchScoreboard) -> String {
    let mut lines = vec![
        format!("Match {} [{}]", board.match_id, or_unknown(&board.status)),
        format!(
            "{} {} at {}",
            board.map,
            board.score,
            format_timestamp(board.finished_at)
        ),
    ];
    if board.teams.is_empty() {
        lines.push("Detailed statistics are not available for this match".to_string());
        return lines.join("\n");
    }

    for team in &board.teams {
        lines.push(String::new());
        lines.push(format!("{} ({})", or_unknown(&team.name), team.score));
        lines.push(format!(
            "  {:<18} {:>3} {:>3} {:>3} {:>5} {:>5} {:>6}",
            "Player", "K", "D", "A", "K/D", "HS%", "ADR"
        ));
        let mut players: Vec<_> = team.players.iter().collect();
        players.sort_by(|a, b| b.kills.cmp(&a.kills));
        for p in players {
            lines.push(format!(
                "  {:<18} {:>3} {:>3} {:>3} {:>5.2} {:>5.1} {:>6.1}",
                p.nickname, p.kills, p.deaths, p.assists, p.kd_ratio, p.headshot_pct, p.adr
            ));
        }
    }
    lines.join("\n")
}
