//! SQLite repository implementation.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use pinboard_core::pins::{PinChange, PinnedItem};
use pinboard_core::storage::{PinRepository, RepositoryError, Result};

use super::conversions::{format_datetime, row_to_pin};
use super::error::{map_rusqlite_error, map_tokio_rusqlite_error};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based pin repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

/// Runs one change inside the batch transaction.
fn execute_change(
    tx: &rusqlite::Transaction<'_>,
    user_id: &str,
    change: &PinChange,
) -> rusqlite::Result<()> {
    let rows = match change {
        PinChange::Created(pin) => tx.execute(
            schema::INSERT_PIN,
            rusqlite::params![
                pin.id.to_string(),
                user_id,
                pin.entity_type.as_str(),
                pin.entity_id.to_string(),
                pin.display_order,
                format_datetime(&pin.pinned_at),
                format_datetime(&pin.last_accessed_at),
            ],
        )?,
        PinChange::Updated(pin) => tx.execute(
            schema::UPDATE_PIN,
            rusqlite::params![
                pin.id.to_string(),
                user_id,
                pin.display_order,
                format_datetime(&pin.last_accessed_at),
            ],
        )?,
        PinChange::Deleted(pin) => {
            tx.execute(schema::DELETE_PIN, rusqlite::params![pin.id.to_string(), user_id])?
        }
    };

    if rows == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}

#[async_trait]
impl PinRepository for SqliteRepository {
    async fn load_pins(&self, user_id: Uuid) -> Result<Vec<PinnedItem>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_PINS_BY_USER).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_pin)
                    .map_err(wrap_err)?;

                let mut pins = Vec::new();
                for row_result in rows {
                    pins.push(row_result.map_err(wrap_err)?);
                }
                Ok(pins)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn apply_changes(&self, user_id: Uuid, changes: &[PinChange]) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        if let Some(foreign) = changes.iter().find(|c| c.pin().user_id != user_id) {
            return Err(RepositoryError::InvalidData(format!(
                "pin {} belongs to user {}, not {}",
                foreign.pin().id,
                foreign.pin().user_id,
                user_id
            )));
        }

        let user_id_str = user_id.to_string();
        let changes = changes.to_vec();

        // The inner result carries per-row failures; returning it drops the
        // transaction, which rolls back everything written so far.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                for change in &changes {
                    if let Err(err) = execute_change(&tx, &user_id_str, change) {
                        return Ok(Err(map_rusqlite_error(
                            &err,
                            &change.pin().id.to_string(),
                        )));
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(()))
            })
            .await
            .map_err(map_tokio_rusqlite_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pinboard_core::pins::{EntityRef, EntityType};

    fn pin(user_id: Uuid, entity_type: EntityType, display_order: i32) -> PinnedItem {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 7, 45, 0).unwrap();
        PinnedItem::new(
            user_id,
            EntityRef::new(entity_type, Uuid::new_v4()),
            display_order,
            now,
        )
    }

    #[tokio::test]
    async fn test_create_and_load() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let list = pin(user_id, EntityType::List, 1);
        let contact = pin(user_id, EntityType::Contact, 0);

        repo.apply_changes(
            user_id,
            &[
                PinChange::Created(list.clone()),
                PinChange::Created(contact.clone()),
            ],
        )
        .await
        .unwrap();

        let loaded = repo.load_pins(user_id).await.unwrap();
        assert_eq!(loaded, vec![contact, list]);
    }

    #[tokio::test]
    async fn test_update_changes_only_mutable_columns() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let original = pin(user_id, EntityType::Task, 0);
        repo.apply_changes(user_id, &[PinChange::Created(original.clone())])
            .await
            .unwrap();

        let updated = PinnedItem {
            display_order: 3,
            last_accessed_at: original.last_accessed_at + Duration::days(2),
            ..original.clone()
        };
        repo.apply_changes(user_id, &[PinChange::Updated(updated.clone())])
            .await
            .unwrap();

        assert_eq!(repo.load_pins(user_id).await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let item = pin(user_id, EntityType::Project, 0);
        repo.apply_changes(user_id, &[PinChange::Created(item.clone())])
            .await
            .unwrap();

        repo.apply_changes(user_id, &[PinChange::Deleted(item.clone())])
            .await
            .unwrap();
        assert!(repo.load_pins(user_id).await.unwrap().is_empty());

        let again = repo
            .apply_changes(user_id, &[PinChange::Deleted(item.clone())])
            .await;
        assert_eq!(again, Err(RepositoryError::pin_not_found(item.id)));
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let existing = pin(user_id, EntityType::Routine, 0);
        repo.apply_changes(user_id, &[PinChange::Created(existing.clone())])
            .await
            .unwrap();

        let result = repo
            .apply_changes(
                user_id,
                &[
                    PinChange::Deleted(existing.clone()),
                    PinChange::Created(pin(user_id, EntityType::Task, 1)),
                    PinChange::Updated(pin(user_id, EntityType::Task, 2)),
                ],
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert_eq!(repo.load_pins(user_id).await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn test_duplicate_entity_maps_to_already_exists() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = Uuid::new_v4();
        let original = pin(user_id, EntityType::Task, 0);
        let copy = PinnedItem {
            id: Uuid::new_v4(),
            ..original.clone()
        };

        let result = repo
            .apply_changes(
                user_id,
                &[PinChange::Created(original), PinChange::Created(copy.clone())],
            )
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "PinnedItem",
                id: copy.id.to_string(),
            })
        );
        assert!(repo.load_pins(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_user() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let alice_pin = pin(alice, EntityType::Task, 0);
        repo.apply_changes(alice, &[PinChange::Created(alice_pin.clone())])
            .await
            .unwrap();

        assert!(repo.load_pins(bob).await.unwrap().is_empty());

        let foreign = repo
            .apply_changes(bob, &[PinChange::Deleted(alice_pin)])
            .await;
        assert!(matches!(foreign, Err(RepositoryError::InvalidData(_))));
        assert_eq!(repo.load_pins(alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let path = std::env::temp_dir().join(format!("pinboard-test-{}.db", Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();
        let user_id = Uuid::new_v4();
        let item = pin(user_id, EntityType::Contact, 0);

        {
            let repo = SqliteRepository::new(&path_str).await.unwrap();
            repo.apply_changes(user_id, &[PinChange::Created(item.clone())])
                .await
                .unwrap();
        }

        let reopened = SqliteRepository::new(&path_str).await.unwrap();
        assert_eq!(reopened.load_pins(user_id).await.unwrap(), vec![item]);

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
