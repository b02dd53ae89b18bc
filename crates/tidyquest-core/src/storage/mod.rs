//! Persistence gateway.
//!
//! The engine treats persistence as an opaque async key-value store
//! ([`KeyValueStore`]); [`QuestStore`] layers typed JSON records on top.
//! Two implementations ship here: a rusqlite-backed store for production
//! and an in-memory store for tests and embedding hosts that bring their
//! own persistence.

pub mod gateway;
pub mod memory;
pub mod sqlite;

pub use gateway::{keys, CleaningSession, CompletedQuests, KeyValueStore, QuestStore};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/tidyquest[-dev]/` based on TIDYQUEST_ENV.
///
/// Set TIDYQUEST_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIDYQUEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tidyquest-dev")
    } else {
        base_dir.join("tidyquest")
    };

    std::fs::create_dir_all(&dir).map_err(|err| StorageError::DataDir(err.to_string()))?;
    Ok(dir)
}
