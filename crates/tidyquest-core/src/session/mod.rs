mod engine;
pub mod streak;

pub use engine::{ActiveQuest, PausedQuest, QuestProgress, SessionEngine, SessionState};
