//! Points policy.
//!
//! Point values per quest category, plus the thresholds that gate community
//! access. Speed-clean quests scale with duration; everything else is a
//! fixed lookup.

use serde::{Deserialize, Serialize};

use crate::quest::QuestCategory;

/// Points and gating thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsPolicy {
    /// Lifetime points needed to unlock community access.
    pub community_unlock: u32,
    /// Weekly points needed to keep community access active for the week.
    pub weekly_minimum: u32,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            community_unlock: 300,
            weekly_minimum: 100,
        }
    }
}

impl PointsPolicy {
    /// Points earned for completing a quest of the given category.
    ///
    /// Speed cleans earn `100 + 10 per full 5 minutes`, capped at 200,
    /// and fall back to 100 when no duration is known.
    pub fn quest_points(&self, category: QuestCategory, duration_min: Option<u32>) -> u32 {
        match category {
            QuestCategory::Daily => 100,
            QuestCategory::Weekly => 150,
            QuestCategory::Monthly => 250,
            QuestCategory::Seasonal => 250,
            QuestCategory::DeepClean => 300,
            QuestCategory::Declutter => 200,
            QuestCategory::Laundry => 150,
            QuestCategory::Pet => 150,
            QuestCategory::SpeedClean => match duration_min {
                Some(duration) => (100 + (duration / 5) * 10).min(200),
                None => 100,
            },
        }
    }
}
