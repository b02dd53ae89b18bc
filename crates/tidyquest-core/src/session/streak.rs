//! Daily streak bookkeeping.
//!
//! The streak counts consecutive calendar days with at least one
//! completion. It is advanced at most once per day of effect: the second
//! completion on the same day changes nothing.

use chrono::NaiveDate;

use crate::profile::ProfileStats;

/// Apply one completion on `today` against the recorded last-active date.
///
/// Yesterday extends the streak; today is already counted; anything older
/// (or no record at all) starts over at 1. The caller persists `today` as
/// the new last-active date afterwards.
pub fn apply(stats: &mut ProfileStats, last_active: Option<NaiveDate>, today: NaiveDate) {
    match last_active {
        Some(last) if last == today => {}
        Some(last) if Some(last) == today.pred_opt() => {
            stats.current_streak += 1;
        }
        _ => {
            stats.current_streak = 1;
        }
    }
    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
}
