//! Quest scoring.
//!
//! All factors are additive from a base of zero; higher wins. Ties resolve
//! to the first maximum in catalog order, which keeps the ideal-set path
//! fully deterministic for a fixed catalog, profile, and clock.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::profile::{HomeSize, Struggle, UserProfile};
use crate::quest::{Frequency, Quest, QuestCategory};

/// Time-of-day title bonus (+20).
///
/// Morning quests ("morning" in the title) score before noon; wind-down
/// quests ("night") score from 17:00. Case-insensitive.
pub fn time_of_day_bonus(quest: &Quest, now: DateTime<Utc>) -> i32 {
    let hour = now.hour();
    let title = quest.title.to_lowercase();
    if hour < 12 && title.contains("morning") {
        20
    } else if hour >= 17 && title.contains("night") {
        20
    } else {
        0
    }
}

/// Energy match bonus (+15 / +5).
///
/// The profile's energy level maps to a suggested duration ceiling
/// (veryLow=5, low=10, medium=20, high=45 minutes). Within the ceiling
/// scores +15; within twice the ceiling scores +5.
pub fn energy_bonus(quest: &Quest, profile: &UserProfile) -> i32 {
    let Some(energy) = profile.energy else {
        return 0;
    };
    let ceiling = energy.duration_ceiling_min();
    if quest.duration_min <= ceiling {
        15
    } else if quest.duration_min <= ceiling * 2 {
        5
    } else {
        0
    }
}

/// Home-size bonus (+10).
///
/// Small homes favor speed cleans, medium homes favor dailies, large homes
/// favor quests that target a specific room.
pub fn home_size_bonus(quest: &Quest, profile: &UserProfile) -> i32 {
    match profile.home.size() {
        HomeSize::Small if quest.category == QuestCategory::SpeedClean => 10,
        HomeSize::Medium if quest.category == QuestCategory::Daily => 10,
        HomeSize::Large if quest.room.is_some() => 10,
        _ => 0,
    }
}

/// Weekend bonus (+10) for weekly-frequency quests on Saturday/Sunday.
pub fn weekend_weekly_bonus(quest: &Quest, now: DateTime<Utc>) -> i32 {
    let weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
    if weekend && quest.frequency == Frequency::Weekly {
        10
    } else {
        0
    }
}

/// Struggle bonus. Only the profile's recorded struggle branch applies:
/// trouble starting favors short step lists (+15 for ≤5 steps), trouble
/// finishing favors short quests (+15 for ≤10 minutes), trouble deciding
/// favors any concrete suggestion (+10 flat).
pub fn struggle_bonus(quest: &Quest, profile: &UserProfile) -> i32 {
    match profile.struggle {
        Some(Struggle::Starting) if quest.steps.len() <= 5 => 15,
        Some(Struggle::Finishing) if quest.duration_min <= 10 => 15,
        Some(Struggle::Deciding) => 10,
        _ => 0,
    }
}

/// Combined score for a quest.
pub fn score_quest(quest: &Quest, profile: &UserProfile, now: DateTime<Utc>) -> i32 {
    time_of_day_bonus(quest, now)
        + energy_bonus(quest, profile)
        + home_size_bonus(quest, profile)
        + weekend_weekly_bonus(quest, now)
        + struggle_bonus(quest, profile)
}
