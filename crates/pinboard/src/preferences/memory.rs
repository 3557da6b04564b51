//! In-memory preference store.
//!
//! Values live in a per-user map; changes fan out over one tokio broadcast
//! channel per user.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use pinboard_core::preferences::{
    incoming_wins, validate_key, PreferenceChange, PreferenceStore, Result, StoredPreference,
};

/// Channel capacity for preference change messages.
const CHANNEL_CAPACITY: usize = 100;

type UserPreferences = HashMap<String, StoredPreference>;

/// In-memory preference store with last-writer-wins conflict resolution.
#[derive(Debug, Clone)]
pub struct MemoryPreferenceStore {
    values: Arc<RwLock<HashMap<Uuid, UserPreferences>>>,
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<PreferenceChange>>>>,
}

impl MemoryPreferenceStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets or creates the change channel for the given user.
    async fn get_or_create_channel(&self, user_id: Uuid) -> broadcast::Sender<PreferenceChange> {
        // Try read lock first to avoid write contention
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&user_id) {
                return sender.clone();
            }
        }

        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Stores `value` (or a tombstone) if it wins against the current entry.
    async fn write(
        &self,
        user_id: Uuid,
        key: &str,
        value: Option<serde_json::Value>,
        written_at: DateTime<Utc>,
    ) -> Result<bool> {
        validate_key(key)?;
        let sender = self.get_or_create_channel(user_id).await;

        // Held until the notification is sent; notifications follow commit order.
        let mut values = self.values.write().await;
        let prefs = values.entry(user_id).or_default();
        if !incoming_wins(prefs.get(key), written_at) {
            tracing::debug!(%user_id, key, %written_at, "Ignored outdated preference write");
            return Ok(false);
        }
        prefs.insert(
            key.to_string(),
            StoredPreference {
                value: value.clone(),
                written_at,
            },
        );

        // No subscribers is fine.
        let _ = sender.send(PreferenceChange {
            user_id,
            key: key.to_string(),
            value,
            written_at,
        });

        Ok(true)
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, user_id: Uuid, key: &str) -> Result<Option<serde_json::Value>> {
        validate_key(key)?;
        let values = self.values.read().await;
        Ok(values
            .get(&user_id)
            .and_then(|prefs| prefs.get(key))
            .and_then(|stored| stored.value.clone()))
    }

    async fn set(
        &self,
        user_id: Uuid,
        key: &str,
        value: serde_json::Value,
        written_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.write(user_id, key, Some(value), written_at).await
    }

    async fn remove(&self, user_id: Uuid, key: &str, written_at: DateTime<Utc>) -> Result<bool> {
        self.write(user_id, key, None, written_at).await
    }

    async fn subscribe(&self, user_id: Uuid) -> Result<broadcast::Receiver<PreferenceChange>> {
        let sender = self.get_or_create_channel(user_id).await;
        Ok(sender.subscribe())
    }
}
