//! Integration tests for the session engine's full lifecycle.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tidyquest_core::{
    profile::week_start, BonfireState, Clock, CommunityLedger, Event, Frequency, LedgerError,
    ManualClock, MemoryStore, NamedRoom, Quest, QuestCategory, QuestStep, QuestStore, RoomType,
    SessionEngine, SessionState, UserProfile,
};

/// Ledger double that records every contribution.
#[derive(Default)]
struct RecordingLedger {
    contributions: Mutex<Vec<(String, u32)>>,
}

#[async_trait]
impl CommunityLedger for RecordingLedger {
    async fn contribute(&self, anonymous_id: &str, amount: u32) -> Result<(), LedgerError> {
        self.contributions
            .lock()
            .unwrap()
            .push((anonymous_id.to_string(), amount));
        Ok(())
    }

    async fn query_state(&self) -> Result<BonfireState, LedgerError> {
        Err(LedgerError::Disabled)
    }
}

/// Ledger double that always fails.
struct FailingLedger;

#[async_trait]
impl CommunityLedger for FailingLedger {
    async fn contribute(&self, _anonymous_id: &str, _amount: u32) -> Result<(), LedgerError> {
        Err(LedgerError::Remote {
            status: 503,
            message: "unavailable".to_string(),
        })
    }

    async fn query_state(&self) -> Result<BonfireState, LedgerError> {
        Err(LedgerError::Disabled)
    }
}

fn make_quest(id: &str, category: QuestCategory, duration_min: u32, steps: usize) -> Quest {
    Quest {
        id: id.to_string(),
        title: format!("Quest {id}"),
        subtitle: String::new(),
        category,
        frequency: Frequency::Daily,
        duration_min,
        steps: (0..steps)
            .map(|n| QuestStep {
                id: format!("{id}-s{n}"),
                instruction: format!("step {n}"),
                explanation: None,
                duration_min: None,
            })
            .collect(),
        room: None,
    }
}

// 2025-06-02 is a Monday.
fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

struct Harness {
    kv: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    ledger: Arc<RecordingLedger>,
    engine: SessionEngine,
}

async fn harness() -> Harness {
    let kv = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(monday_morning()));
    let ledger = Arc::new(RecordingLedger::default());
    let engine = SessionEngine::load(kv.clone(), ledger.clone(), clock.clone()).await;
    Harness {
        kv,
        clock,
        ledger,
        engine,
    }
}

#[tokio::test]
async fn complete_round_trip_records_everything() {
    let mut h = harness().await;
    let quest = make_quest("dishes", QuestCategory::Daily, 25, 3);

    h.engine.start(quest, None).await.unwrap();
    h.engine.advance_step().await.unwrap();
    h.engine.advance_step().await.unwrap();
    // Already on the last step: advancing further is a no-op.
    assert!(h.engine.advance_step().await.unwrap().is_none());

    h.clock.advance(Duration::minutes(30));
    let event = h.engine.complete().await.unwrap().unwrap();
    let completed_at = h.clock.now();

    match event {
        Event::QuestCompleted {
            quest_id,
            earned_points,
            actual_minutes,
            community_unlocked,
            ..
        } => {
            assert_eq!(quest_id, "dishes");
            assert_eq!(earned_points, 100);
            assert_eq!(actual_minutes, 30);
            assert!(!community_unlocked);
        }
        other => panic!("expected QuestCompleted, got {other:?}"),
    }

    let store = QuestStore::new(h.kv.clone());
    let completed = store.load_completed().await;
    assert_eq!(completed.last_completed("dishes"), Some(completed_at));

    let history = store.load_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quest_id, "dishes");
    assert_eq!(history[0].actual_minutes, 30);
    assert_eq!(history[0].date, completed_at.date_naive());

    let profile = h.engine.profile();
    assert_eq!(profile.stats.tasks_completed, 1);
    assert_eq!(profile.stats.total_minutes_cleaned, 30);
    assert_eq!(profile.total_points, 100);
    assert_eq!(profile.weekly_points, 100);
    assert_eq!(profile.stats.current_streak, 1);

    assert!(store.load_checkpoint().await.is_none());
    assert!(matches!(h.engine.state(), SessionState::Idle));

    // The persisted profile matches the in-memory one.
    assert_eq!(&store.load_profile().await, profile);
}

#[tokio::test]
async fn instant_completion_counts_at_least_one_minute() {
    let mut h = harness().await;
    h.engine
        .start(make_quest("blitz", QuestCategory::SpeedClean, 5, 1), None)
        .await
        .unwrap();
    let event = h.engine.complete().await.unwrap().unwrap();
    match event {
        Event::QuestCompleted { actual_minutes, .. } => assert_eq!(actual_minutes, 1),
        other => panic!("expected QuestCompleted, got {other:?}"),
    }
}

#[tokio::test]
async fn streak_counts_consecutive_days() {
    let mut h = harness().await;

    for day in 0..3 {
        h.engine
            .start(make_quest("daily", QuestCategory::Daily, 10, 1), None)
            .await
            .unwrap();
        h.engine.complete().await.unwrap();
        if day < 2 {
            h.clock.advance(Duration::hours(24));
        }
    }
    assert_eq!(h.engine.profile().stats.current_streak, 3);
    assert_eq!(h.engine.profile().stats.longest_streak, 3);

    // A second completion on the same day changes nothing.
    h.engine
        .start(make_quest("again", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    h.engine.complete().await.unwrap();
    assert_eq!(h.engine.profile().stats.current_streak, 3);

    // A two-day gap resets the current streak but keeps the longest.
    h.clock.advance(Duration::hours(72));
    h.engine
        .start(make_quest("later", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    h.engine.complete().await.unwrap();
    assert_eq!(h.engine.profile().stats.current_streak, 1);
    assert_eq!(h.engine.profile().stats.longest_streak, 3);
}

#[tokio::test]
async fn pause_preserves_progress_and_resume_restores_it() {
    let mut h = harness().await;
    let quest = make_quest("laundry", QuestCategory::Laundry, 40, 4);

    h.engine
        .start(quest, Some("room-7".to_string()))
        .await
        .unwrap();
    h.engine.advance_step().await.unwrap();
    h.engine.advance_step().await.unwrap();

    h.engine.pause().await.unwrap();
    assert!(matches!(h.engine.state(), SessionState::Paused(_)));

    let store = QuestStore::new(h.kv.clone());
    let paused = store.load_paused().await.unwrap();
    assert_eq!(paused.step_index, 2);
    assert_eq!(paused.room_id.as_deref(), Some("room-7"));
    assert_eq!(paused.task_started_at, monday_morning());
    // Pausing swaps the checkpoint for the paused snapshot.
    assert!(store.load_checkpoint().await.is_none());

    h.clock.advance(Duration::minutes(20));
    h.engine.resume().await.unwrap();

    let active = h.engine.active_quest().unwrap();
    assert_eq!(active.step_index, 2);
    assert_eq!(active.room_id.as_deref(), Some("room-7"));
    // Original start is preserved: the paused gap counts as elapsed time.
    assert_eq!(active.started_at, monday_morning());
    assert!(store.load_paused().await.is_none());
    assert!(store.load_checkpoint().await.is_some());

    // Completing now includes the 20 paused minutes.
    let event = h.engine.complete().await.unwrap().unwrap();
    match event {
        Event::QuestCompleted { actual_minutes, .. } => assert_eq!(actual_minutes, 20),
        other => panic!("expected QuestCompleted, got {other:?}"),
    }
}

#[tokio::test]
async fn dismissing_a_paused_quest_makes_resume_a_noop() {
    let mut h = harness().await;
    h.engine
        .start(make_quest("mop", QuestCategory::Weekly, 20, 2), None)
        .await
        .unwrap();
    h.engine.pause().await.unwrap();

    assert!(h.engine.dismiss_paused().await.unwrap().is_some());
    assert!(matches!(h.engine.state(), SessionState::Idle));
    assert!(QuestStore::new(h.kv.clone()).load_paused().await.is_none());

    assert!(h.engine.resume().await.unwrap().is_none());
}

#[tokio::test]
async fn paused_quest_survives_restart() {
    let kv = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(monday_morning()));
    let ledger = Arc::new(RecordingLedger::default());

    {
        let mut engine = SessionEngine::load(kv.clone(), ledger.clone(), clock.clone()).await;
        engine
            .start(make_quest("vacuum", QuestCategory::Weekly, 30, 3), None)
            .await
            .unwrap();
        engine.advance_step().await.unwrap();
        engine.pause().await.unwrap();
    }

    // Fresh process: the engine restores the paused state from storage.
    let mut engine = SessionEngine::load(kv.clone(), ledger, clock.clone()).await;
    assert!(matches!(engine.state(), SessionState::Paused(_)));

    engine.resume().await.unwrap();
    let active = engine.active_quest().unwrap();
    assert_eq!(active.quest.id, "vacuum");
    assert_eq!(active.step_index, 1);
    assert_eq!(active.started_at, monday_morning());
}

#[tokio::test]
async fn starting_over_a_paused_quest_drops_the_snapshot() {
    let mut h = harness().await;
    h.engine
        .start(make_quest("first", QuestCategory::Daily, 10, 2), None)
        .await
        .unwrap();
    h.engine.pause().await.unwrap();

    h.engine
        .start(make_quest("second", QuestCategory::Daily, 10, 2), None)
        .await
        .unwrap();

    assert_eq!(h.engine.active_quest().unwrap().quest.id, "second");
    assert!(QuestStore::new(h.kv.clone()).load_paused().await.is_none());
}

#[tokio::test]
async fn skip_discards_without_recording() {
    let mut h = harness().await;
    h.engine
        .start(make_quest("skipme", QuestCategory::Declutter, 15, 2), None)
        .await
        .unwrap();
    h.engine.skip().await.unwrap();

    assert!(matches!(h.engine.state(), SessionState::Idle));
    let store = QuestStore::new(h.kv.clone());
    assert!(store.load_completed().await.is_empty());
    assert!(store.load_history().await.is_empty());
    assert!(store.load_checkpoint().await.is_none());
    assert_eq!(h.engine.profile().total_points, 0);
}

#[tokio::test]
async fn invalid_transitions_are_noops() {
    let mut h = harness().await;
    assert!(h.engine.complete().await.unwrap().is_none());
    assert!(h.engine.pause().await.unwrap().is_none());
    assert!(h.engine.resume().await.unwrap().is_none());
    assert!(h.engine.skip().await.unwrap().is_none());
    assert!(h.engine.advance_step().await.unwrap().is_none());
    assert!(h.engine.dismiss_paused().await.unwrap().is_none());
}

#[tokio::test]
async fn crossing_unlock_threshold_flips_access_once_and_stamps_rooms() {
    let mut h = harness().await;

    // Seed a profile at 290 points with a named room.
    let mut profile = UserProfile::default();
    profile.total_points = 290;
    let room = NamedRoom::new(RoomType::Bathroom, "Main Bath");
    let room_id = room.id.clone();
    profile.home.rooms.push(room);
    h.engine.set_profile(profile).await.unwrap();

    let mut quest = make_quest("deep-bath", QuestCategory::DeepClean, 45, 3);
    quest.room = Some(RoomType::Bathroom);
    h.engine.start(quest, Some(room_id.clone())).await.unwrap();
    h.clock.advance(Duration::minutes(45));
    let event = h.engine.complete().await.unwrap().unwrap();
    let completed_at = h.clock.now();

    match event {
        Event::QuestCompleted {
            earned_points,
            community_unlocked,
            ..
        } => {
            assert_eq!(earned_points, 300);
            assert!(community_unlocked);
        }
        other => panic!("expected QuestCompleted, got {other:?}"),
    }

    let profile = h.engine.profile();
    assert_eq!(profile.total_points, 590);
    assert!(profile.has_community_access);
    assert_eq!(profile.community_unlock_date, Some(completed_at));
    // 300 weekly points also clears the weekly activity bar.
    assert!(profile.is_community_access_active);

    let room = profile.home.room(&room_id).unwrap();
    assert_eq!(room.last_cleaned, Some(completed_at));
    assert_eq!(room.last_deep_cleaned, Some(completed_at));

    // Access granted before the contribution step, so the ledger saw it.
    let contributions = h.ledger.contributions.lock().unwrap();
    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].1, 300);

    // A later completion must not flip the unlock again.
    drop(contributions);
    h.engine
        .start(make_quest("more", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    h.engine.complete().await.unwrap();
    assert_eq!(h.engine.profile().community_unlock_date, Some(completed_at));
}

#[tokio::test]
async fn contributions_only_flow_after_unlock() {
    let mut h = harness().await;

    // 100 points: below the 300 unlock bar, nothing contributed.
    h.engine
        .start(make_quest("small", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    h.engine.complete().await.unwrap();
    assert!(h.ledger.contributions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ledger_failure_never_rolls_back_completion() {
    let kv = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(monday_morning()));
    let mut engine = SessionEngine::load(kv.clone(), Arc::new(FailingLedger), clock.clone()).await;

    let mut profile = UserProfile::default();
    profile.total_points = 500;
    profile.has_community_access = true;
    engine.set_profile(profile).await.unwrap();

    engine
        .start(make_quest("resilient", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    let event = engine.complete().await.unwrap();
    assert!(event.is_some());

    let store = QuestStore::new(kv);
    assert!(store.load_completed().await.last_completed("resilient").is_some());
    assert_eq!(store.load_profile().await.total_points, 600);
}

#[tokio::test]
async fn weekly_reset_applies_at_load_time() {
    let kv = Arc::new(MemoryStore::new());
    let store = QuestStore::new(kv.clone());
    let now = monday_morning();

    let mut stale = UserProfile::default();
    stale.weekly_points = 250;
    stale.is_community_access_active = true;
    stale.has_community_access = true;
    stale.weekly_points_reset = Some(week_start(now) - Duration::weeks(2));
    store.save_profile(&stale).await.unwrap();

    let clock = Arc::new(ManualClock::new(now));
    let engine =
        SessionEngine::load(kv.clone(), Arc::new(RecordingLedger::default()), clock.clone()).await;

    let profile = engine.profile();
    assert_eq!(profile.weekly_points, 0);
    assert!(!profile.is_community_access_active);
    assert!(profile.has_community_access); // lifetime unlock survives
    assert_eq!(profile.weekly_points_reset, Some(week_start(now)));

    // The reset was persisted, so a second load sees a current date and
    // leaves fresh weekly points alone.
    assert_eq!(store.load_profile().await.weekly_points, 0);
}

#[tokio::test]
async fn weekly_reset_skipped_within_current_week() {
    let kv = Arc::new(MemoryStore::new());
    let store = QuestStore::new(kv.clone());
    let now = monday_morning() + Duration::days(3);

    let mut current = UserProfile::default();
    current.weekly_points = 120;
    current.is_community_access_active = true;
    current.weekly_points_reset = Some(week_start(now));
    store.save_profile(&current).await.unwrap();

    let clock = Arc::new(ManualClock::new(now));
    let engine =
        SessionEngine::load(kv, Arc::new(RecordingLedger::default()), clock.clone()).await;

    assert_eq!(engine.profile().weekly_points, 120);
    assert!(engine.profile().is_community_access_active);
}

#[tokio::test]
async fn reset_all_preserves_anonymous_identity() {
    let mut h = harness().await;
    let store = QuestStore::new(h.kv.clone());
    let anonymous_id = store.anonymous_id().await.unwrap();

    h.engine
        .start(make_quest("gone", QuestCategory::Daily, 10, 1), None)
        .await
        .unwrap();
    h.engine.complete().await.unwrap();
    assert_eq!(h.engine.profile().total_points, 100);

    h.engine.reset_all().await.unwrap();

    assert_eq!(h.engine.profile().total_points, 0);
    assert!(store.load_completed().await.is_empty());
    assert!(store.load_history().await.is_empty());
    assert_eq!(store.anonymous_id().await.unwrap(), anonymous_id);
}
