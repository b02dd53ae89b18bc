use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every session state change produces an Event.
/// The GUI renders them; nothing in the core consumes them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    QuestStarted {
        quest_id: String,
        room_id: Option<String>,
        at: DateTime<Utc>,
    },
    StepAdvanced {
        quest_id: String,
        step_index: usize,
        at: DateTime<Utc>,
    },
    QuestPaused {
        quest_id: String,
        step_index: usize,
        at: DateTime<Utc>,
    },
    QuestResumed {
        quest_id: String,
        step_index: usize,
        at: DateTime<Utc>,
    },
    PausedDismissed {
        quest_id: String,
        at: DateTime<Utc>,
    },
    QuestSkipped {
        quest_id: String,
        step_index: usize,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        quest_id: String,
        earned_points: u32,
        actual_minutes: u32,
        community_unlocked: bool,
        at: DateTime<Utc>,
    },
}
