//! Typed gateway over the opaque key-value store.
//!
//! Reads recover in place: a missing, unreadable, or unparseable value is
//! logged and replaced with a safe default, because this is a single-user
//! local-first app where availability beats strict error surfacing. Writes
//! return errors -- the session engine's completion ordering depends on
//! knowing whether a write landed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::session::{PausedQuest, QuestProgress};

/// Stable persistence keys.
pub mod keys {
    pub const USER_PROFILE: &str = "user_profile";
    pub const COMPLETED_QUESTS: &str = "completed_quests";
    pub const CLEANING_HISTORY: &str = "cleaning_history";
    pub const QUEST_PROGRESS: &str = "quest_progress";
    pub const PAUSED_QUEST: &str = "paused_quest";
    pub const ANONYMOUS_ID: &str = "anonymous_id";
    pub const ACCOUNT_CREATED_AT: &str = "account_created_at";
    pub const LAST_ACTIVE_DATE: &str = "last_active_date";

    /// Keys removed by a full data reset. The anonymous id survives so
    /// community identity is stable across wipes.
    pub const RESET_KEYS: [&str; 7] = [
        USER_PROFILE,
        COMPLETED_QUESTS,
        CLEANING_HISTORY,
        QUEST_PROGRESS,
        PAUSED_QUEST,
        ACCOUNT_CREATED_AT,
        LAST_ACTIVE_DATE,
    ];
}

/// Opaque async key-value persistence boundary.
///
/// The host application decides where the bytes live; the engine only
/// needs get/set/remove with string keys and values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Map from quest id to its most recent completion instant.
///
/// Repeated completions overwrite; only the latest is retained per id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedQuests(HashMap<String, DateTime<Utc>>);

impl CompletedQuests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, quest_id: &str, at: DateTime<Utc>) {
        self.0.insert(quest_id.to_string(), at);
    }

    pub fn last_completed(&self, quest_id: &str) -> Option<DateTime<Utc>> {
        self.0.get(quest_id).copied()
    }

    pub fn completed_today(&self, quest_id: &str, today: NaiveDate) -> bool {
        self.0
            .get(quest_id)
            .map(|at| at.date_naive() == today)
            .unwrap_or(false)
    }

    /// Ids of every quest completed on the given calendar day.
    pub fn ids_completed_today(&self, today: NaiveDate) -> HashSet<String> {
        self.0
            .iter()
            .filter(|(_, at)| at.date_naive() == today)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One completed cleaning session, as shown in history.
///
/// The title is denormalized on purpose: history must keep rendering even
/// if the catalog entry changes or disappears in a later app version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningSession {
    pub quest_id: String,
    pub quest_title: String,
    pub date: NaiveDate,
    pub actual_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

/// Typed JSON records over an opaque [`KeyValueStore`].
#[derive(Clone)]
pub struct QuestStore {
    kv: Arc<dyn KeyValueStore>,
}

impl QuestStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.kv.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(key, error = %err, "stored value failed to parse; using default");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "storage read failed; using default");
                None
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await?;
        Ok(())
    }

    pub async fn load_profile(&self) -> crate::profile::UserProfile {
        self.read_json(keys::USER_PROFILE).await.unwrap_or_default()
    }

    pub async fn save_profile(&self, profile: &crate::profile::UserProfile) -> Result<()> {
        self.write_json(keys::USER_PROFILE, profile).await
    }

    pub async fn load_completed(&self) -> CompletedQuests {
        self.read_json(keys::COMPLETED_QUESTS)
            .await
            .unwrap_or_default()
    }

    pub async fn save_completed(&self, completed: &CompletedQuests) -> Result<()> {
        self.write_json(keys::COMPLETED_QUESTS, completed).await
    }

    pub async fn load_history(&self) -> Vec<CleaningSession> {
        self.read_json(keys::CLEANING_HISTORY)
            .await
            .unwrap_or_default()
    }

    /// Append one session to the history list. History is append-only;
    /// nothing here ever rewrites or prunes past entries.
    pub async fn append_history(&self, session: &CleaningSession) -> Result<()> {
        let mut history = self.load_history().await;
        history.push(session.clone());
        self.write_json(keys::CLEANING_HISTORY, &history).await
    }

    pub async fn load_checkpoint(&self) -> Option<QuestProgress> {
        self.read_json(keys::QUEST_PROGRESS).await
    }

    pub async fn save_checkpoint(&self, checkpoint: &QuestProgress) -> Result<()> {
        self.write_json(keys::QUEST_PROGRESS, checkpoint).await
    }

    pub async fn clear_checkpoint(&self) -> Result<()> {
        self.kv.remove(keys::QUEST_PROGRESS).await?;
        Ok(())
    }

    pub async fn load_paused(&self) -> Option<PausedQuest> {
        self.read_json(keys::PAUSED_QUEST).await
    }

    pub async fn save_paused(&self, paused: &PausedQuest) -> Result<()> {
        self.write_json(keys::PAUSED_QUEST, paused).await
    }

    pub async fn clear_paused(&self) -> Result<()> {
        self.kv.remove(keys::PAUSED_QUEST).await?;
        Ok(())
    }

    /// Stable anonymous community identity; created on first use.
    pub async fn anonymous_id(&self) -> Result<String> {
        if let Some(id) = self.kv.get(keys::ANONYMOUS_ID).await? {
            if !id.is_empty() {
                return Ok(id);
            }
        }
        let id = Uuid::new_v4().to_string();
        self.kv.set(keys::ANONYMOUS_ID, &id).await?;
        Ok(id)
    }

    pub async fn account_created_at(&self) -> Option<DateTime<Utc>> {
        self.read_json(keys::ACCOUNT_CREATED_AT).await
    }

    /// Stamp the account creation instant if it has never been recorded.
    pub async fn ensure_account_created_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        if let Some(at) = self.account_created_at().await {
            return Ok(at);
        }
        self.write_json(keys::ACCOUNT_CREATED_AT, &now).await?;
        Ok(now)
    }

    pub async fn load_last_active(&self) -> Option<NaiveDate> {
        self.read_json(keys::LAST_ACTIVE_DATE).await
    }

    pub async fn save_last_active(&self, date: NaiveDate) -> Result<()> {
        self.write_json(keys::LAST_ACTIVE_DATE, &date).await
    }

    /// Remove all engine data except the anonymous community id.
    pub async fn reset_all(&self) -> Result<()> {
        for key in keys::RESET_KEYS {
            self.kv.remove(key).await?;
        }
        Ok(())
    }
}
