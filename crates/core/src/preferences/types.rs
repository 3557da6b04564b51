//! Preference values and the last-writer-wins rule.
//!
//! Preferences are written from several tabs or devices at once. The write
//! with the newer `written_at` wins; on a tie the stored value is kept so the
//! outcome does not depend on arrival order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{PreferenceError, Result};

/// Maximum length of a preference key.
pub const MAX_KEY_LEN: usize = 128;

/// A stored preference value. `None` marks a removal (tombstone), kept so an
/// older concurrent write cannot resurrect the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreference {
    pub value: Option<serde_json::Value>,
    pub written_at: DateTime<Utc>,
}

/// Notification sent to subscribers when a preference changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceChange {
    pub user_id: Uuid,
    pub key: String,
    /// The new value, or `None` if the key was removed.
    pub value: Option<serde_json::Value>,
    pub written_at: DateTime<Utc>,
}

/// Returns true if `incoming` should replace `current`.
pub fn incoming_wins(current: Option<&StoredPreference>, incoming: DateTime<Utc>) -> bool {
    current.is_none_or(|stored| incoming > stored.written_at)
}

/// Validates a preference key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() || key.len() > MAX_KEY_LEN {
        return Err(PreferenceError::InvalidKey(key.to_string()));
    }
    Ok(())
}
