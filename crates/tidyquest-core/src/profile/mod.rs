//! User profile and derived profile state.
//!
//! One profile per installation. The session engine mutates it on every
//! completion; preference fields come from onboarding. The weekly points
//! window is evaluated lazily at load time, never by a timer.

pub mod home;

pub use home::{
    generate_default_rooms, FloorCount, HomeConfiguration, HomeSize, NamedRoom, WindowAmount,
};

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported energy level from onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnergyLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Suggested quest duration ceiling, in minutes.
    pub fn duration_ceiling_min(self) -> u32 {
        match self {
            EnergyLevel::VeryLow => 5,
            EnergyLevel::Low => 10,
            EnergyLevel::Medium => 20,
            EnergyLevel::High => 45,
        }
    }
}

/// What the user says they struggle with most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Struggle {
    /// Getting started at all.
    Starting,
    /// Finishing what they started.
    Finishing,
    /// Deciding what to do.
    Deciding,
    /// Staying motivated over time.
    Motivation,
}

/// How the user felt during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feeling {
    Overwhelmed,
    Stressed,
    Okay,
    Motivated,
}

/// Preferred coaching tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Gentle,
    Encouraging,
    Direct,
}

/// Cumulative completion stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub tasks_completed: u32,
    pub total_minutes_cleaned: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Onboarding answers, applied in one shot when the wizard finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnswers {
    pub feeling: Option<Feeling>,
    pub struggle: Option<Struggle>,
    pub energy: Option<EnergyLevel>,
    pub tone: Option<Tone>,
    pub bedrooms: u8,
    pub bathrooms: f32,
    pub floors: FloorCount,
    pub windows: WindowAmount,
    pub has_pets: bool,
}

/// The per-installation user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub onboarding_complete: bool,

    // Preference fields, unset until onboarding.
    pub feeling: Option<Feeling>,
    pub struggle: Option<Struggle>,
    pub energy: Option<EnergyLevel>,
    pub tone: Option<Tone>,

    pub home: HomeConfiguration,
    pub stats: ProfileStats,

    pub total_points: u32,
    pub weekly_points: u32,
    /// Start of the week the weekly counter was last reset for.
    pub weekly_points_reset: Option<DateTime<Utc>>,

    pub has_community_access: bool,
    pub is_community_access_active: bool,
    pub community_unlock_date: Option<DateTime<Utc>>,

    pub auth_id: Option<String>,
}

impl UserProfile {
    /// Apply the onboarding answers and regenerate/reconcile the room list.
    pub fn apply_onboarding(&mut self, answers: OnboardingAnswers) {
        self.feeling = answers.feeling;
        self.struggle = answers.struggle;
        self.energy = answers.energy;
        self.tone = answers.tone;
        self.home.bedrooms = answers.bedrooms;
        self.home.bathrooms = answers.bathrooms;
        self.home.floors = answers.floors;
        self.home.windows = answers.windows;
        self.home.has_pets = answers.has_pets;
        self.home.reconcile_rooms();
        self.onboarding_complete = true;
    }

    /// Reset the weekly points window if `now` has crossed into a new week.
    ///
    /// Weeks start Monday 00:00. When the recorded reset instant is absent
    /// or predates the current week start, weekly points drop to zero and
    /// active community access is cleared -- it must be re-earned within
    /// the new week. Returns whether anything changed.
    pub fn apply_weekly_reset(&mut self, now: DateTime<Utc>) -> bool {
        let start = week_start(now);
        let due = match self.weekly_points_reset {
            None => true,
            Some(previous) => previous < start,
        };
        if due {
            self.weekly_points = 0;
            self.weekly_points_reset = Some(start);
            self.is_community_access_active = false;
        }
        due
    }
}

/// Monday 00:00 of the week containing `now`.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let monday =
        now.date_naive() - Duration::days(i64::from(now.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}
