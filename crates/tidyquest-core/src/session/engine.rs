//! Session engine implementation.
//!
//! The session engine is the state machine governing an in-progress quest.
//! It is driven by one logical actor (the interactive session) and never
//! runs two transitions concurrently; operations that touch the
//! persistence gateway or the community ledger are async but serialized by
//! the caller.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Active -> (Paused | Idle)
//! Paused -> Active (resume) | Idle (dismiss)
//! ```
//!
//! Invalid transitions are silent no-ops (`Ok(None)`): the host UI makes
//! them unreachable, and defensive handling avoids corrupting state.
//! Persistence writes that a transition depends on happen *before* the
//! in-memory state flips, so an interrupted process restarts from either
//! "not yet done, checkpoint intact" or "fully done, checkpoint cleared".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::community::CommunityLedger;
use crate::error::Result;
use crate::events::Event;
use crate::points::PointsPolicy;
use crate::profile::{OnboardingAnswers, UserProfile};
use crate::quest::{Quest, QuestCategory};
use crate::session::streak;
use crate::storage::{CleaningSession, KeyValueStore, QuestStore};

/// A quest currently being worked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveQuest {
    pub quest: Quest,
    pub room_id: Option<String>,
    pub step_index: usize,
    pub started_at: DateTime<Utc>,
    pub step_started_at: DateTime<Utc>,
}

/// Snapshot of a paused quest, persisted until resume or dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedQuest {
    pub quest: Quest,
    pub step_index: usize,
    pub room_id: Option<String>,
    pub paused_at: DateTime<Utc>,
    pub step_started_at: DateTime<Utc>,
    pub task_started_at: DateTime<Utc>,
}

/// Lightweight progress checkpoint, persisted while a quest is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    pub quest_id: String,
    pub step_index: usize,
    pub started_at: DateTime<Utc>,
}

/// Session state. At most one of an active session or a paused snapshot
/// exists at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveQuest),
    Paused(PausedQuest),
}

/// Core session engine.
///
/// Owns the authoritative in-memory profile; every mutation is persisted
/// through the gateway before the mutated state is relied on.
pub struct SessionEngine {
    store: QuestStore,
    ledger: Arc<dyn CommunityLedger>,
    clock: Arc<dyn Clock>,
    policy: PointsPolicy,
    profile: UserProfile,
    state: SessionState,
}

impl SessionEngine {
    /// Load the engine from persisted state.
    ///
    /// Applies the weekly points reset, reconciles the room list against
    /// the home's counts, and restores a paused quest if one was
    /// persisted. Storage read failures fall back to defaults.
    pub async fn load(
        kv: Arc<dyn KeyValueStore>,
        ledger: Arc<dyn CommunityLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = QuestStore::new(kv);
        let now = clock.now();

        let mut profile = store.load_profile().await;
        let mut dirty = profile.apply_weekly_reset(now);
        dirty |= profile.home.reconcile_rooms() > 0;
        if dirty {
            if let Err(err) = store.save_profile(&profile).await {
                warn!(error = %err, "failed to persist profile after load-time maintenance");
            }
        }

        let state = match store.load_paused().await {
            Some(paused) => SessionState::Paused(paused),
            None => SessionState::Idle,
        };

        Self {
            store,
            ledger,
            clock,
            policy: PointsPolicy::default(),
            profile,
            state,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn policy(&self) -> &PointsPolicy {
        &self.policy
    }

    pub fn active_quest(&self) -> Option<&ActiveQuest> {
        match &self.state {
            SessionState::Active(active) => Some(active),
            _ => None,
        }
    }

    // ── Profile surface ──────────────────────────────────────────────

    /// Replace the profile (preference edits from the host). The room list
    /// is reconciled so it always covers the configured counts.
    pub async fn set_profile(&mut self, mut profile: UserProfile) -> Result<()> {
        profile.home.reconcile_rooms();
        self.store.save_profile(&profile).await?;
        self.profile = profile;
        Ok(())
    }

    /// Record the onboarding answers and stamp account creation.
    pub async fn record_onboarding(&mut self, answers: OnboardingAnswers) -> Result<()> {
        let now = self.clock.now();
        let mut profile = self.profile.clone();
        profile.apply_onboarding(answers);
        self.store.save_profile(&profile).await?;
        self.profile = profile;
        self.store.ensure_account_created_at(now).await?;
        Ok(())
    }

    /// Wipe all engine data except the anonymous community id, and return
    /// to a fresh idle state.
    pub async fn reset_all(&mut self) -> Result<()> {
        self.store.reset_all().await?;
        self.profile = UserProfile::default();
        self.state = SessionState::Idle;
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a quest. Always allowed; any previous active session is
    /// discarded, and an outstanding paused snapshot is dropped so at most
    /// one of active/paused exists.
    pub async fn start(&mut self, quest: Quest, room_id: Option<String>) -> Result<Option<Event>> {
        if matches!(self.state, SessionState::Paused(_)) {
            debug!(quest_id = %quest.id, "starting over an outstanding paused quest; dropping it");
            self.store.clear_paused().await?;
        }

        let now = self.clock.now();
        self.store
            .save_checkpoint(&QuestProgress {
                quest_id: quest.id.clone(),
                step_index: 0,
                started_at: now,
            })
            .await?;

        let event = Event::QuestStarted {
            quest_id: quest.id.clone(),
            room_id: room_id.clone(),
            at: now,
        };
        self.state = SessionState::Active(ActiveQuest {
            quest,
            room_id,
            step_index: 0,
            started_at: now,
            step_started_at: now,
        });
        Ok(Some(event))
    }

    /// Advance to the next step. No-op on the last step or outside an
    /// active session.
    pub async fn advance_step(&mut self) -> Result<Option<Event>> {
        let (quest_id, next_index, started_at) = match &self.state {
            SessionState::Active(active) if active.step_index + 1 < active.quest.steps.len() => (
                active.quest.id.clone(),
                active.step_index + 1,
                active.started_at,
            ),
            _ => return Ok(None),
        };

        let now = self.clock.now();
        self.store
            .save_checkpoint(&QuestProgress {
                quest_id: quest_id.clone(),
                step_index: next_index,
                started_at,
            })
            .await?;

        if let SessionState::Active(active) = &mut self.state {
            active.step_index = next_index;
            active.step_started_at = now;
        }
        Ok(Some(Event::StepAdvanced {
            quest_id,
            step_index: next_index,
            at: now,
        }))
    }

    /// Pause the active quest, checkpointing progress for a later resume.
    pub async fn pause(&mut self) -> Result<Option<Event>> {
        let now = self.clock.now();
        let snapshot = match &self.state {
            SessionState::Active(active) => PausedQuest {
                quest: active.quest.clone(),
                step_index: active.step_index,
                room_id: active.room_id.clone(),
                paused_at: now,
                step_started_at: active.step_started_at,
                task_started_at: active.started_at,
            },
            _ => return Ok(None),
        };

        self.store.save_paused(&snapshot).await?;
        self.store.clear_checkpoint().await?;

        let event = Event::QuestPaused {
            quest_id: snapshot.quest.id.clone(),
            step_index: snapshot.step_index,
            at: now,
        };
        self.state = SessionState::Paused(snapshot);
        Ok(Some(event))
    }

    /// Resume the paused quest, from memory or from the persisted record.
    ///
    /// The original task-start instant is preserved, so time spent paused
    /// counts toward the elapsed duration at completion.
    pub async fn resume(&mut self) -> Result<Option<Event>> {
        let paused = match &self.state {
            SessionState::Paused(paused) => paused.clone(),
            SessionState::Idle => match self.store.load_paused().await {
                Some(paused) => paused,
                None => return Ok(None),
            },
            SessionState::Active(_) => return Ok(None),
        };

        let now = self.clock.now();
        self.store
            .save_checkpoint(&QuestProgress {
                quest_id: paused.quest.id.clone(),
                step_index: paused.step_index,
                started_at: paused.task_started_at,
            })
            .await?;
        self.store.clear_paused().await?;

        let event = Event::QuestResumed {
            quest_id: paused.quest.id.clone(),
            step_index: paused.step_index,
            at: now,
        };
        self.state = SessionState::Active(ActiveQuest {
            quest: paused.quest,
            room_id: paused.room_id,
            step_index: paused.step_index,
            started_at: paused.task_started_at,
            step_started_at: now,
        });
        Ok(Some(event))
    }

    /// Drop the paused quest without resuming it.
    pub async fn dismiss_paused(&mut self) -> Result<Option<Event>> {
        let quest_id = match &self.state {
            SessionState::Paused(paused) => paused.quest.id.clone(),
            SessionState::Active(_) => return Ok(None),
            SessionState::Idle => match self.store.load_paused().await {
                Some(paused) => paused.quest.id,
                None => return Ok(None),
            },
        };

        self.store.clear_paused().await?;
        if matches!(self.state, SessionState::Paused(_)) {
            self.state = SessionState::Idle;
        }
        Ok(Some(Event::PausedDismissed {
            quest_id,
            at: self.clock.now(),
        }))
    }

    /// Abandon the active quest. No completion is recorded and no points
    /// are awarded.
    pub async fn skip(&mut self) -> Result<Option<Event>> {
        let (quest_id, step_index) = match &self.state {
            SessionState::Active(active) => (active.quest.id.clone(), active.step_index),
            _ => return Ok(None),
        };

        self.store.clear_checkpoint().await?;
        self.state = SessionState::Idle;
        Ok(Some(Event::QuestSkipped {
            quest_id,
            step_index,
            at: self.clock.now(),
        }))
    }

    /// Complete the active quest.
    ///
    /// Effects, in order: record the completion, append history, award
    /// points, stamp room timestamps, update profile totals and community
    /// gates, contribute to the community ledger (best-effort), advance
    /// the streak, persist the profile, clear the checkpoint. The
    /// completion and history writes land before this method returns the
    /// earned points; the checkpoint is cleared only after the profile
    /// write succeeds.
    pub async fn complete(&mut self) -> Result<Option<Event>> {
        let active = match &self.state {
            SessionState::Active(active) => active.clone(),
            _ => return Ok(None),
        };

        let now = self.clock.now();
        let elapsed_min = ((now - active.started_at).num_seconds() as f64 / 60.0).round() as i64;
        let actual_minutes = elapsed_min.max(1) as u32;

        let mut completed = self.store.load_completed().await;
        completed.record(&active.quest.id, now);
        self.store.save_completed(&completed).await?;

        self.store
            .append_history(&CleaningSession {
                quest_id: active.quest.id.clone(),
                quest_title: active.quest.title.clone(),
                date: now.date_naive(),
                actual_minutes,
                completed_at: now,
            })
            .await?;

        let earned = self
            .policy
            .quest_points(active.quest.category, Some(active.quest.duration_min));

        if let Some(room_id) = &active.room_id {
            if let Some(room) = self.profile.home.room_mut(room_id) {
                room.last_cleaned = Some(now);
                if active.quest.category == QuestCategory::DeepClean {
                    room.last_deep_cleaned = Some(now);
                }
            }
        }

        self.profile.stats.tasks_completed += 1;
        self.profile.stats.total_minutes_cleaned += actual_minutes;
        self.profile.total_points += earned;
        self.profile.weekly_points += earned;

        let mut community_unlocked = false;
        if !self.profile.has_community_access
            && self.profile.total_points >= self.policy.community_unlock
        {
            self.profile.has_community_access = true;
            self.profile.community_unlock_date = Some(now);
            community_unlocked = true;
        }

        if self.profile.has_community_access
            && self.profile.weekly_points >= self.policy.weekly_minimum
        {
            self.profile.is_community_access_active = true;
        }

        // Best-effort: a ledger failure never rolls back the completion.
        if self.profile.has_community_access {
            match self.store.anonymous_id().await {
                Ok(anonymous_id) => {
                    if let Err(err) = self.ledger.contribute(&anonymous_id, earned).await {
                        warn!(error = %err, "community contribution failed; keeping local completion");
                    }
                }
                Err(err) => {
                    warn!(error = %err, "no anonymous id available; skipping contribution");
                }
            }
        }

        let today = now.date_naive();
        let last_active = self.store.load_last_active().await;
        streak::apply(&mut self.profile.stats, last_active, today);
        self.store.save_last_active(today).await?;

        self.store.save_profile(&self.profile).await?;
        self.store.clear_checkpoint().await?;
        self.state = SessionState::Idle;

        Ok(Some(Event::QuestCompleted {
            quest_id: active.quest.id,
            earned_points: earned,
            actual_minutes,
            community_unlocked,
            at: now,
        }))
    }
}
