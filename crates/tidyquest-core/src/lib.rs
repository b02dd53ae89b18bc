//! # TidyQuest Core Library
//!
//! This library provides the core business logic for TidyQuest: the quest
//! recommendation engine and the session/progress engine behind the app's
//! screens. The GUI is a thin layer over this crate -- every rule that
//! decides what to surface next or mutates derived state (streaks, points,
//! community gating, room cleanliness) lives here.
//!
//! ## Architecture
//!
//! - **Session Engine**: An explicit state machine over an in-progress
//!   quest (start/advance/pause/resume/skip/complete) whose transitions
//!   persist through the gateway before in-memory state flips
//! - **Recommendation Engine**: Pure functions of (profile, completion
//!   history, now) over the read-only quest catalog
//! - **Storage**: An opaque async key-value gateway with SQLite and
//!   in-memory implementations
//! - **Community**: Client boundary to the shared "bonfire" ledger plus
//!   the pure decay math the UI renders with
//!
//! Time-based effects (streak breaks, weekly resets, bonfire decay) are
//! computed lazily against an injectable [`Clock`]; there are no timers or
//! background tasks in this core.
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Quest session state machine
//! - [`RecommendationEngine`]: Next-quest selection
//! - [`QuestStore`]: Typed records over the key-value gateway
//! - [`CommunityLedger`]: Trait for the remote shared ledger

pub mod clock;
pub mod community;
pub mod config;
pub mod error;
pub mod events;
pub mod points;
pub mod profile;
pub mod quest;
pub mod recommend;
pub mod session;
pub mod stats;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use community::{
    decayed_position, next_position, BonfireState, CommunityLedger, HttpLedger, NullLedger,
};
pub use config::EngineConfig;
pub use error::{ConfigError, CoreError, LedgerError, Result, StorageError};
pub use events::Event;
pub use points::PointsPolicy;
pub use profile::{
    generate_default_rooms, EnergyLevel, Feeling, HomeConfiguration, HomeSize, NamedRoom,
    OnboardingAnswers, ProfileStats, Struggle, Tone, UserProfile,
};
pub use quest::{Catalog, Frequency, Quest, QuestCategory, QuestStep, RoomType};
pub use recommend::{Recommendation, RecommendationEngine};
pub use session::{ActiveQuest, PausedQuest, QuestProgress, SessionEngine, SessionState};
pub use storage::{
    CleaningSession, CompletedQuests, KeyValueStore, MemoryStore, QuestStore, SqliteStore,
};
