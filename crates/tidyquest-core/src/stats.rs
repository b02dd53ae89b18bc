//! Derived stats for the host's screens.

use chrono::NaiveDate;

use crate::storage::CleaningSession;

/// Human-readable duration: "5 min", "1 hr", "1 hr 30 min".
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {rest} min")
    }
}

/// Total minutes cleaned on or after the given day.
pub fn minutes_cleaned_since(history: &[CleaningSession], since: NaiveDate) -> u32 {
    history
        .iter()
        .filter(|session| session.date >= since)
        .map(|session| session.actual_minutes)
        .sum()
}

/// Number of sessions completed on a given day.
pub fn sessions_on(history: &[CleaningSession], date: NaiveDate) -> usize {
    history
        .iter()
        .filter(|session| session.date == date)
        .count()
}
