use async_trait::async_trait;
use uuid::Uuid;

use crate::pins::{EntityRef, PinChange, PinnedItem};

use super::Result;

/// Persistence collaborator for pin sets.
///
/// The pin engine keeps every user's pins in memory and hands each
/// operation's changes to the repository before committing them.
#[async_trait]
pub trait PinRepository: Send + Sync {
    /// Loads every stored pin of a user.
    async fn load_pins(&self, user_id: Uuid) -> Result<Vec<PinnedItem>>;

    /// Persists the changes of one operation.
    ///
    /// Implementations apply the whole batch or none of it. An error means
    /// nothing was stored.
    async fn apply_changes(&self, user_id: Uuid, changes: &[PinChange]) -> Result<()>;
}

/// Entity-existence collaborator.
///
/// Pins hold only a typed reference to entities owned elsewhere; this trait
/// answers whether such a reference still resolves.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// Returns true if the referenced entity still exists.
    async fn entity_exists(&self, entity: EntityRef) -> Result<bool>;
}
