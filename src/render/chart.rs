//! ASCII line chart for the K/D trend.

/// Default plot size used by the reports.
pub const CHART_WIDTH: usize = 40;
pub const CHART_HEIGHT: usize = 8;

/// Plot a newest-first K/D series with the oldest match on the left.
///
/// Only the newest `width` points are shown. The y range is padded by 10% of
/// the data span, or by 0.1 when every point is equal.
pub fn kd_chart(series: &[f64], width: usize, height: usize) -> String {
    if series.is_empty() || width == 0 {
        return "No data available".to_string();
    }
    let height = height.max(2);

    let shown = series.len().min(width);
    let points: Vec<f64> = series[..shown].iter().rev().copied().collect();

    let (mut low, mut high) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &kd| {
            (lo.min(kd), hi.max(kd))
        });
    let mut padding = (high - low) * 0.1;
    if padding == 0.0 {
        padding = 0.1;
    }
    low -= padding;
    high += padding;

    let level = |kd: f64| -> usize {
        let normalized = (kd - low) / (high - low);
        let y = (normalized * (height - 1) as f64) as i64;
        y.clamp(0, height as i64 - 1) as usize
    };

    // grid[row][col], row 0 is the top line
    let mut grid = vec![vec![' '; shown]; height];
    for (x, &kd) in points.iter().enumerate() {
        let row = height - 1 - level(kd);
        grid[row][x] = '●';

        if let Some(&next) = points.get(x + 1) {
            let next_row = height - 1 - level(next);
            let (from, to) = if row < next_row {
                (row + 1, next_row)
            } else {
                (next_row + 1, row)
            };
            for cell in grid.iter_mut().take(to).skip(from) {
                if cell[x] == ' ' {
                    cell[x] = '│';
                }
            }
        }
    }

    let mut lines = vec!["K/D Trend:".to_string()];
    for (row, cells) in grid.iter().enumerate() {
        let value = low + (high - low) * (height - 1 - row) as f64 / (height - 1) as f64;
        lines.push(format!("{:>5.2} │{}", value, cells.iter().collect::<String>()));
    }
    lines.push(format!("      └{}", "─".repeat(shown)));

    // Match numbers counted from the oldest shown match
    let mut labels = vec![' '; shown + 8];
    let mut next_free = 0;
    for x in 0..shown {
        if x % 5 != 0 && x != shown - 1 {
            continue;
        }
        let label = (x + 1).to_string();
        if x < next_free {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            labels[x + offset] = ch;
        }
        next_free = x + label.len() + 1;
    }
    let labels: String = labels.into_iter().collect();
    lines.push(format!("       {}", labels.trim_end()));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot_rows(chart: &str) -> Vec<&str> {
        chart
            .lines()
            .skip(1)
            .take_while(|line| line.contains('│'))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(kd_chart(&[], 20, 5), "No data available");
    }

    #[test]
    fn test_oldest_on_left() {
        // Newest first: the newest match is the highest point
        let chart = kd_chart(&[2.0, 1.0, 0.5], 20, 5);
        let rows = plot_rows(&chart);

        assert_eq!(rows.len(), 5);
        assert!(rows[1].ends_with("│  ●"), "row 1 was {:?}", rows[1]);
        assert!(rows[2].ends_with("│ │ "), "row 2 was {:?}", rows[2]);
        assert!(rows[3].ends_with("│ ● "), "row 3 was {:?}", rows[3]);
        assert!(rows[4].ends_with("│●  "), "row 4 was {:?}", rows[4]);
    }

    #[test]
    fn test_flat_series_padding() {
        let chart = kd_chart(&[1.0, 1.0, 1.0], 20, 3);
        let rows = plot_rows(&chart);

        assert!(rows[0].trim_start().starts_with("1.10"));
        assert!(rows[2].trim_start().starts_with("0.90"));
        assert_eq!(rows.iter().filter(|r| r.contains("●●●")).count(), 1);
    }

    #[test]
    fn test_width_limits_to_newest_points() {
        let series: Vec<f64> = (0..50).map(|i| i as f64 / 10.0).collect();
        let chart = kd_chart(&series, 10, 4);

        let axis = chart.lines().find(|l| l.contains('└')).unwrap();
        assert_eq!(axis.trim_start().chars().count(), 11);
    }

    #[test]
    fn test_axis_labels() {
        let chart = kd_chart(&[1.0; 12], 40, 3);
        let labels = chart.lines().last().unwrap();
        // "12" would collide with "11" and is dropped
        assert_eq!(labels.trim(), "1    6    11");
    }
}
