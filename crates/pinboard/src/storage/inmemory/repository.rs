//! In-memory pin repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pinboard_core::pins::{sort_by_display_order, PinChange, PinnedItem};
use pinboard_core::storage::{PinRepository, RepositoryError, Result};

type UserRows = HashMap<Uuid, PinnedItem>;

/// In-memory pin storage.
///
/// Rows are grouped by user and keyed by pin id. A change batch is validated
/// and applied against a copy of the user's rows, which replaces the stored
/// rows only if every change succeeded.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    pins: Arc<RwLock<HashMap<Uuid, UserRows>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            pins: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn apply_change(rows: &mut UserRows, user_id: Uuid, change: &PinChange) -> Result<()> {
    let pin = change.pin();
    if pin.user_id != user_id {
        return Err(RepositoryError::InvalidData(format!(
            "pin {} belongs to user {}, not {}",
            pin.id, pin.user_id, user_id
        )));
    }

    match change {
        PinChange::Created(pin) => {
            if rows.contains_key(&pin.id) {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "PinnedItem",
                    id: pin.id.to_string(),
                });
            }
            if rows.values().any(|row| row.references(&pin.entity())) {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "PinnedItem",
                    id: pin.entity().to_string(),
                });
            }
            rows.insert(pin.id, pin.clone());
        }
        PinChange::Updated(pin) => match rows.get_mut(&pin.id) {
            Some(row) => *row = pin.clone(),
            None => return Err(RepositoryError::pin_not_found(pin.id)),
        },
        PinChange::Deleted(pin) => {
            if rows.remove(&pin.id).is_none() {
                return Err(RepositoryError::pin_not_found(pin.id));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl PinRepository for InMemoryRepository {
    async fn load_pins(&self, user_id: Uuid) -> Result<Vec<PinnedItem>> {
        let pins = self.pins.read().await;
        let mut rows: Vec<PinnedItem> = pins
            .get(&user_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        sort_by_display_order(&mut rows);
        Ok(rows)
    }

    async fn apply_changes(&self, user_id: Uuid, changes: &[PinChange]) -> Result<()> {
        let mut pins = self.pins.write().await;
        let mut rows = pins.get(&user_id).cloned().unwrap_or_default();

        for change in changes {
            apply_change(&mut rows, user_id, change)?;
        }

        pins.insert(user_id, rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pinboard_core::pins::{EntityRef, EntityType};

    fn pin(user_id: Uuid, display_order: i32) -> PinnedItem {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        PinnedItem::new(
            user_id,
            EntityRef::new(EntityType::Project, Uuid::new_v4()),
            display_order,
            now,
        )
    }

    #[tokio::test]
    async fn test_load_unknown_user_is_empty() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_pins(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let repo = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let first = pin(user_id, 1);
        let second = pin(user_id, 0);

        repo.apply_changes(
            user_id,
            &[
                PinChange::Created(first.clone()),
                PinChange::Created(second.clone()),
            ],
        )
        .await
        .unwrap();
        assert_eq!(
            repo.load_pins(user_id).await.unwrap(),
            vec![second.clone(), first.clone()]
        );

        let moved = PinnedItem {
            display_order: 5,
            ..second.clone()
        };
        repo.apply_changes(user_id, &[PinChange::Updated(moved.clone())])
            .await
            .unwrap();
        repo.apply_changes(user_id, &[PinChange::Deleted(first)])
            .await
            .unwrap();

        assert_eq!(repo.load_pins(user_id).await.unwrap(), vec![moved]);
    }

    #[tokio::test]
    async fn test_failed_batch_applies_nothing() {
        let repo = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let existing = pin(user_id, 0);
        repo.apply_changes(user_id, &[PinChange::Created(existing.clone())])
            .await
            .unwrap();

        let result = repo
            .apply_changes(
                user_id,
                &[
                    PinChange::Deleted(existing.clone()),
                    PinChange::Updated(pin(user_id, 1)),
                ],
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(repo.load_pins(user_id).await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn test_duplicate_entity_rejected() {
        let repo = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let original = pin(user_id, 0);
        let copy = PinnedItem {
            id: Uuid::new_v4(),
            display_order: 1,
            ..original.clone()
        };

        let result = repo
            .apply_changes(
                user_id,
                &[PinChange::Created(original), PinChange::Created(copy)],
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
        assert!(repo.load_pins(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_user_rejected() {
        let repo = InMemoryRepository::new();
        let result = repo
            .apply_changes(Uuid::new_v4(), &[PinChange::Created(pin(Uuid::new_v4(), 0))])
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let repo = InMemoryRepository::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        repo.apply_changes(alice, &[PinChange::Created(pin(alice, 0))])
            .await
            .unwrap();

        assert_eq!(repo.load_pins(alice).await.unwrap().len(), 1);
        assert!(repo.load_pins(bob).await.unwrap().is_empty());
    }
}
