//! Quest catalog types.
//!
//! Quests are immutable task definitions supplied by the external catalog at
//! build time; everything else in the engine references them by id. The
//! catalog's iteration order is part of the contract -- recommendation
//! tie-breaks resolve to the first maximum in catalog order.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Category of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestCategory {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
    SpeedClean,
    DeepClean,
    Declutter,
    Laundry,
    Pet,
}

/// How often a quest is meant to recur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    AdHoc,
}

/// Room types a quest can target and a home can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomType {
    Bedroom,
    Bathroom,
    Kitchen,
    LivingRoom,
    Entryway,
    PetArea,
}

/// One step of a quest's instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestStep {
    pub id: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
}

/// An immutable quest definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: QuestCategory,
    pub frequency: Frequency,
    /// Nominal duration in minutes. Always positive.
    pub duration_min: u32,
    pub steps: Vec<QuestStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomType>,
}

impl Quest {
    /// Whether this quest's title names the given weekday.
    ///
    /// The catalog encodes day-of-week targeting for weekly quests by
    /// putting the literal weekday name in the title ("Monday Kitchen
    /// Reset"). Only Monday through Friday participate; Saturday and
    /// Sunday never match. This substring convention is inherited from
    /// the catalog's authoring style and must not be "fixed" here --
    /// an explicit day field on the quest would break parity with the
    /// shipped catalog.
    pub fn targets_weekday(&self, day: Weekday) -> bool {
        weekday_title_name(day)
            .map(|name| self.title.contains(name))
            .unwrap_or(false)
    }

    /// The first weekday (Monday..Friday order) this quest's title names.
    pub fn referenced_weekday(&self) -> Option<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .find(|day| self.targets_weekday(*day))
    }
}

/// Title substring used for weekday targeting; weekends are never targeted.
pub fn weekday_title_name(day: Weekday) -> Option<&'static str> {
    match day {
        Weekday::Mon => Some("Monday"),
        Weekday::Tue => Some("Tuesday"),
        Weekday::Wed => Some("Wednesday"),
        Weekday::Thu => Some("Thursday"),
        Weekday::Fri => Some("Friday"),
        Weekday::Sat | Weekday::Sun => None,
    }
}

/// Read-only, ordered quest catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    quests: Vec<Quest>,
}

impl Catalog {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}
