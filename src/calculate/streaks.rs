//! Win/loss streaks over a newest-first match list.

use crate::models::{MatchRecord, StreakKind, Streaks};

/// Compute the current streak and the longest win/loss runs.
///
/// The current streak counts matches from index 0 (most recent) while the
/// win/non-win classification stays the same. Longest runs are a global
/// maximum over contiguous runs anywhere in the list.
pub fn compute_streaks(matches: &[MatchRecord]) -> Streaks {
    let Some(latest) = matches.first() else {
        return Streaks::default();
    };

    let leading_win = latest.result.is_win();
    let run = matches
        .iter()
        .take_while(|m| m.result.is_win() == leading_win)
        .count() as i32;

    let (current, kind) = if leading_win {
        (run, StreakKind::Win)
    } else {
        (-run, StreakKind::Loss)
    };

    let mut win_run = 0u32;
    let mut loss_run = 0u32;
    let mut longest_win = 0u32;
    let mut longest_loss = 0u32;

    for record in matches {
        if record.result.is_win() {
            win_run += 1;
            loss_run = 0;
            longest_win = longest_win.max(win_run);
        } else {
            loss_run += 1;
            win_run = 0;
            longest_loss = longest_loss.max(loss_run);
        }
    }

    Streaks {
        current,
        kind,
        longest_win,
        longest_loss,
    }
}
