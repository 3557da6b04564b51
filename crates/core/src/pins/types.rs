use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PinError;

/// The kinds of entities a user can pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Task,
    Project,
    Contact,
    Routine,
    List,
}

impl EntityType {
    /// Every pinnable entity type.
    pub const ALL: [EntityType; 5] = [
        EntityType::Task,
        EntityType::Project,
        EntityType::Contact,
        EntityType::Routine,
        EntityType::List,
    ];

    /// Returns the lowercase wire name of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Task => "task",
            EntityType::Project => "project",
            EntityType::Contact => "contact",
            EntityType::Routine => "routine",
            EntityType::List => "list",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(EntityType::Task),
            "project" => Ok(EntityType::Project),
            "contact" => Ok(EntityType::Contact),
            "routine" => Ok(EntityType::Routine),
            "list" => Ok(EntityType::List),
            _ => Err(PinError::InvalidEntityType(s.to_string())),
        }
    }
}

/// Typed, non-owning reference to an entity managed outside the pin engine.
///
/// This pair is the logical key of a pin: an entity is pinned at most once
/// per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
}

impl EntityRef {
    pub fn new(entity_type: EntityType, entity_id: Uuid) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

/// A pinned entity for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    /// User-visible position. Not necessarily contiguous.
    pub display_order: i32,
    /// Creation time. Never changes.
    pub pinned_at: DateTime<Utc>,
    /// Last time the user opened or interacted with the pinned entity.
    pub last_accessed_at: DateTime<Utc>,
}

impl PinnedItem {
    /// Creates a new pin with `pinned_at == last_accessed_at == now`.
    pub fn new(user_id: Uuid, entity: EntityRef, display_order: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            entity_type: entity.entity_type,
            entity_id: entity.entity_id,
            display_order,
            pinned_at: now,
            last_accessed_at: now,
        }
    }

    /// Sets a specific ID for this pin (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the last access time, never moving it before `pinned_at`.
    pub fn with_last_accessed_at(mut self, last_accessed_at: DateTime<Utc>) -> Self {
        self.last_accessed_at = last_accessed_at.max(self.pinned_at);
        self
    }

    /// Returns the logical key of this pin.
    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.entity_type, self.entity_id)
    }

    /// Returns true if this pin references the given entity.
    pub fn references(&self, entity: &EntityRef) -> bool {
        self.entity_type == entity.entity_type && self.entity_id == entity.entity_id
    }
}

/// A pin as presented to the host, with derived flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinView {
    #[serde(flatten)]
    pub pin: PinnedItem,
    /// Idle for at least the stale threshold. Advisory only.
    pub is_stale: bool,
    /// The referenced entity no longer resolves.
    pub is_dangling: bool,
}

/// Why a pin was removed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionReason {
    #[serde(rename = "auto-expired")]
    AutoExpired,
}

impl EvictionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionReason::AutoExpired => "auto-expired",
        }
    }
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pin removed by the eviction policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvictedPin {
    pub pin: PinnedItem,
    pub reason: EvictionReason,
}

/// A single mutation of a user's pin set.
///
/// This is the notification contract with the persistence collaborator and
/// the payload broadcast to change subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "pin", rename_all = "camelCase")]
pub enum PinChange {
    Created(PinnedItem),
    Updated(PinnedItem),
    Deleted(PinnedItem),
}

impl PinChange {
    /// Returns the pin this change applies to.
    pub fn pin(&self) -> &PinnedItem {
        match self {
            PinChange::Created(pin) | PinChange::Updated(pin) | PinChange::Deleted(pin) => pin,
        }
    }

    /// Returns a short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PinChange::Created(_) => "created",
            PinChange::Updated(_) => "updated",
            PinChange::Deleted(_) => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!("task".parse::<EntityType>().unwrap(), EntityType::Task);
        assert_eq!(" Routine ".parse::<EntityType>().unwrap(), EntityType::Routine);
        assert_eq!("LIST".parse::<EntityType>().unwrap(), EntityType::List);
    }

    #[test]
    fn test_entity_type_parse_rejects_unknown() {
        let err = "calendar".parse::<EntityType>().unwrap_err();
        assert_eq!(err, PinError::InvalidEntityType("calendar".to_string()));
    }

    #[test]
    fn test_entity_type_serde_is_lowercase() {
        let json = serde_json::to_string(&EntityType::Contact).unwrap();
        assert_eq!(json, "\"contact\"");

        let parsed: EntityType = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(parsed, EntityType::Project);
        assert!(serde_json::from_str::<EntityType>("\"note\"").is_err());
    }

    #[test]
    fn test_new_pin_has_equal_timestamps() {
        let entity = EntityRef::new(EntityType::Task, Uuid::new_v4());
        let pin = PinnedItem::new(Uuid::new_v4(), entity, 3, t0());

        assert_eq!(pin.pinned_at, pin.last_accessed_at);
        assert_eq!(pin.display_order, 3);
        assert_eq!(pin.entity(), entity);
        assert!(pin.references(&entity));
    }

    #[test]
    fn test_last_accessed_never_precedes_pinned_at() {
        let entity = EntityRef::new(EntityType::Task, Uuid::new_v4());
        let pin = PinnedItem::new(Uuid::new_v4(), entity, 0, t0())
            .with_last_accessed_at(t0() - Duration::days(2));

        assert_eq!(pin.last_accessed_at, t0());
    }

    #[test]
    fn test_pin_serializes_camel_case() {
        let entity = EntityRef::new(EntityType::List, Uuid::nil());
        let pin = PinnedItem::new(Uuid::nil(), entity, 0, t0()).with_id(Uuid::nil());
        let value = serde_json::to_value(&pin).unwrap();

        assert_eq!(value["entityType"], "list");
        assert_eq!(value["displayOrder"], 0);
        assert!(value.get("lastAccessedAt").is_some());
    }

    #[test]
    fn test_pin_view_flattens_pin() {
        let entity = EntityRef::new(EntityType::Task, Uuid::nil());
        let view = PinView {
            pin: PinnedItem::new(Uuid::nil(), entity, 1, t0()),
            is_stale: true,
            is_dangling: false,
        };
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["displayOrder"], 1);
        assert_eq!(value["isStale"], true);
        assert_eq!(value["isDangling"], false);
    }

    #[test]
    fn test_eviction_reason_display() {
        assert_eq!(EvictionReason::AutoExpired.to_string(), "auto-expired");
        assert_eq!(
            serde_json::to_string(&EvictionReason::AutoExpired).unwrap(),
            "\"auto-expired\""
        );
    }
}
