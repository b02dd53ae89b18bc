//! Core error types for tidyquest-core.
//!
//! This module defines the error hierarchy using thiserror. Persistence
//! *reads* are generally recovered in place with safe defaults (see
//! `storage::QuestStore`); these types surface the failures that callers
//! must see, notably persistence writes during a completion.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tidyquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence gateway errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Community ledger errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the key-value persistence gateway.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read for a key failed
    #[error("Read failed for key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Write for a key failed
    #[error("Write failed for key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Remove for a key failed
    #[error("Remove failed for key '{key}': {message}")]
    RemoveFailed { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Errors from the remote community ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Transport-level failure
    #[error("Ledger request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The ledger answered with a non-success status
    #[error("Ledger rejected request (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// The ledger is disabled or not configured for this installation
    #[error("Community ledger is disabled")]
    Disabled,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
