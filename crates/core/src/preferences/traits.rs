use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::error::Result;
use super::types::PreferenceChange;

/// Per-user key-value preferences with last-writer-wins semantics.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Gets a preference value.
    async fn get(&self, user_id: Uuid, key: &str) -> Result<Option<serde_json::Value>>;

    /// Writes a preference value.
    ///
    /// Returns false if a write with the same or a newer timestamp is
    /// already stored, in which case nothing changes.
    async fn set(
        &self,
        user_id: Uuid,
        key: &str,
        value: serde_json::Value,
        written_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Removes a preference, under the same rule as [`PreferenceStore::set`].
    async fn remove(&self, user_id: Uuid, key: &str, written_at: DateTime<Utc>) -> Result<bool>;

    /// Subscribes to changes of a user's preferences.
    async fn subscribe(&self, user_id: Uuid) -> Result<broadcast::Receiver<PreferenceChange>>;
}
