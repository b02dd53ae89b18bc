//! Community ledger ("the bonfire").
//!
//! The ledger is a remote shared-state accumulator the engine contributes
//! points to after completions. The remote transaction is the server's
//! job; locally this module owns the client trait, the wire types, and the
//! pure position math the UI renders with.

pub mod http;

pub use http::HttpLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Default decay, in position units per hour past the grace window.
pub const DECAY_RATE_PER_HOUR: f64 = 0.5;
/// Hours of inactivity before the bonfire starts to decay.
pub const GRACE_HOURS: f64 = 4.0;

/// One user's total on the shared ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonfireUser {
    pub anonymous_id: String,
    pub total_points: u64,
}

/// An immutable contribution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub anonymous_id: String,
    pub amount: u32,
    pub at: DateTime<Utc>,
}

/// Snapshot of the shared bonfire state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonfireState {
    /// Accumulator position, 0..=100.
    pub position: f64,
    pub last_updated: DateTime<Utc>,
    /// Decay in position units per hour.
    pub decay_rate: f64,
    pub total_contributed: u64,
    #[serde(default)]
    pub users: Vec<BonfireUser>,
    #[serde(default)]
    pub recent: Vec<Contribution>,
}

/// Client boundary to the remote ledger.
///
/// Contributions are at-least-once from the network's point of view; the
/// caller treats every failure as non-fatal to local state.
#[async_trait]
pub trait CommunityLedger: Send + Sync {
    /// Add `amount` points under the given anonymous id.
    async fn contribute(&self, anonymous_id: &str, amount: u32) -> Result<(), LedgerError>;

    /// Fetch the current shared state.
    async fn query_state(&self) -> Result<BonfireState, LedgerError>;
}

/// No-op ledger for offline installs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLedger;

#[async_trait]
impl CommunityLedger for NullLedger {
    async fn contribute(&self, _anonymous_id: &str, _amount: u32) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn query_state(&self) -> Result<BonfireState, LedgerError> {
        Err(LedgerError::Disabled)
    }
}

/// Bonfire position after decay, as rendered locally between syncs.
///
/// Decay only starts `grace_hours` after the last update and never takes
/// the position below zero.
pub fn decayed_position(
    position: f64,
    last_updated: DateTime<Utc>,
    now: DateTime<Utc>,
    decay_rate: f64,
    grace_hours: f64,
) -> f64 {
    let hours_since = (now - last_updated).num_seconds() as f64 / 3600.0;
    let decaying_hours = (hours_since - grace_hours).max(0.0);
    (position - decaying_hours * decay_rate).max(0.0)
}

/// The accumulator rule the server applies on contribution, exposed for
/// optimistic local rendering: one position unit per 100 points, capped
/// at 100.
pub fn next_position(position: f64, amount: u32) -> f64 {
    (position + f64::from(amount) / 100.0).min(100.0)
}
