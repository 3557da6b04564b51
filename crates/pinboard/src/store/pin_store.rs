//! Per-user pin sets with persistence round trips.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use chrono::{DateTime, Utc};
use pinboard_core::clock::{Clock, SystemClock};
use pinboard_core::pins::{
    EntityRef, EvictedPin, PinChange, PinError, PinPolicy, PinSet, PinView, PinnedItem, Result,
    Transition,
};
use pinboard_core::storage::{EntityResolver, PinRepository};

/// Channel capacity for pin change notifications.
const CHANGE_CHANNEL_CAPACITY: usize = 100;

/// A user's pin set; `None` until loaded from the repository.
type UserSlot = Arc<RwLock<Option<PinSet>>>;

/// Pin store for all users of a host.
///
/// Every mutating operation holds the user's write lock while it plans,
/// persists and commits, so invariants hold after each transition and no
/// reader observes a partial write. Changes are committed to memory only
/// after the repository accepted them.
#[derive(Clone)]
pub struct PinStore {
    repository: Arc<dyn PinRepository>,
    resolver: Option<Arc<dyn EntityResolver>>,
    clock: Arc<dyn Clock>,
    policy: PinPolicy,
    users: Arc<RwLock<HashMap<Uuid, UserSlot>>>,
    changes_tx: broadcast::Sender<PinChange>,
}

impl PinStore {
    /// Creates a store backed by `repository`, using the system clock and no
    /// entity resolver.
    pub fn new(repository: Arc<dyn PinRepository>, policy: PinPolicy) -> Self {
        let (changes_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            repository,
            resolver: None,
            clock: Arc::new(SystemClock),
            policy,
            users: Arc::new(RwLock::new(HashMap::new())),
            changes_tx,
        }
    }

    /// Replaces the clock used for staleness and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the resolver used by [`PinStore::list`] to flag dangling pins.
    pub fn with_resolver(mut self, resolver: Arc<dyn EntityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Returns the active policy.
    pub fn policy(&self) -> PinPolicy {
        self.policy
    }

    /// Subscribes to every committed pin change.
    pub fn subscribe(&self) -> broadcast::Receiver<PinChange> {
        self.changes_tx.subscribe()
    }

    /// Pins an entity for a user.
    ///
    /// At capacity, the single most eligible idle pin is removed first. If no
    /// pin has been idle past the auto-unpin threshold the call fails with
    /// [`PinError::CapacityExceeded`] and nothing changes.
    pub async fn pin(&self, user_id: Uuid, entity: EntityRef) -> Result<PinnedItem> {
        let policy = self.policy;
        let outcome = self
            .mutate(user_id, "pin", |set, now| set.plan_pin(entity, now, &policy))
            .await?;

        if let Some(evicted) = &outcome.evicted {
            tracing::info!(
                %user_id,
                pin_id = %evicted.pin.id,
                entity = %evicted.pin.entity(),
                reason = %evicted.reason,
                "Evicted idle pin to make room"
            );
        }

        Ok(outcome.pin)
    }

    /// Removes the pin for an entity. Returns the removed pin.
    pub async fn unpin(&self, user_id: Uuid, entity: EntityRef) -> Result<PinnedItem> {
        self.mutate(user_id, "unpin", |set, _| set.plan_unpin(&entity))
            .await
    }

    /// Records that the user opened or interacted with a pinned entity.
    pub async fn touch(&self, user_id: Uuid, entity: EntityRef) -> Result<PinnedItem> {
        self.mutate(user_id, "touch", |set, now| set.plan_touch(&entity, now))
            .await
    }

    /// Reorders a user's pins. `ordered_ids` must list every current pin id
    /// exactly once.
    pub async fn reorder(&self, user_id: Uuid, ordered_ids: &[Uuid]) -> Result<Vec<PinnedItem>> {
        self.mutate(user_id, "reorder", |set, _| set.plan_reorder(ordered_ids))
            .await
    }

    /// Removes every pin idle past the auto-unpin threshold.
    pub async fn sweep(&self, user_id: Uuid) -> Result<Vec<EvictedPin>> {
        let policy = self.policy;
        let evicted = self
            .mutate(user_id, "sweep", |set, now| Ok(set.plan_sweep(now, &policy)))
            .await?;

        for entry in &evicted {
            tracing::info!(
                %user_id,
                pin_id = %entry.pin.id,
                entity = %entry.pin.entity(),
                reason = %entry.reason,
                "Swept idle pin"
            );
        }

        Ok(evicted)
    }

    /// Lists a user's pins in display order with staleness and dangling
    /// flags. Never changes any pin.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<PinView>> {
        let slot = self.slot(user_id).await;
        self.ensure_loaded(&slot, user_id).await?;

        let mut views = {
            let guard = slot.read().await;
            let now = self.clock.now();
            guard
                .as_ref()
                .map(|set| set.views(now, &self.policy))
                .unwrap_or_default()
        };

        if let Some(resolver) = &self.resolver {
            for view in &mut views {
                let entity = view.pin.entity();
                match resolver.entity_exists(entity).await {
                    Ok(exists) => view.is_dangling = !exists,
                    Err(err) => {
                        tracing::warn!(%user_id, %entity, error = %err, "Entity check failed");
                    }
                }
            }
        }

        Ok(views)
    }

    /// Loads (or reloads) a user's pins from the repository, replacing any
    /// in-memory state. Returns the number of pins loaded.
    pub async fn load_user(&self, user_id: Uuid) -> Result<usize> {
        let slot = self.slot(user_id).await;
        let mut guard = slot.write().await;
        let set = self.load(user_id).await?;
        let count = set.len();
        *guard = Some(set);
        Ok(count)
    }

    /// Drops a user's in-memory pins. Returns true if the user was loaded.
    ///
    /// Waits for in-flight operations on the user. The slot itself stays in
    /// the map so later operations queue on the same lock.
    pub async fn end_session(&self, user_id: Uuid) -> bool {
        let slot = {
            let users = self.users.read().await;
            match users.get(&user_id) {
                Some(slot) => slot.clone(),
                None => return false,
            }
        };

        let removed = slot.write().await.take().is_some();
        if removed {
            tracing::debug!(%user_id, "Ended pin session");
        }
        removed
    }

    /// Gets or creates the slot for the given user.
    async fn slot(&self, user_id: Uuid) -> UserSlot {
        // Try read lock first to avoid write contention
        {
            let users = self.users.read().await;
            if let Some(slot) = users.get(&user_id) {
                return slot.clone();
            }
        }

        let mut users = self.users.write().await;
        users.entry(user_id).or_default().clone()
    }

    async fn ensure_loaded(&self, slot: &UserSlot, user_id: Uuid) -> Result<()> {
        if slot.read().await.is_some() {
            return Ok(());
        }

        let mut guard = slot.write().await;
        if guard.is_none() {
            *guard = Some(self.load(user_id).await?);
        }
        Ok(())
    }

    async fn load(&self, user_id: Uuid) -> Result<PinSet> {
        let rows = self.repository.load_pins(user_id).await?;
        let (set, dropped) = PinSet::from_pins(user_id, rows);

        if dropped > 0 {
            tracing::warn!(%user_id, dropped, "Dropped inconsistent pin rows on load");
        }
        if set.len() > self.policy.max_pins {
            tracing::warn!(
                %user_id,
                count = set.len(),
                max_pins = self.policy.max_pins,
                "Loaded pin set exceeds capacity"
            );
        }
        tracing::debug!(%user_id, count = set.len(), "Loaded pin set");

        Ok(set)
    }

    /// Runs one write operation under the user's exclusive lock.
    async fn mutate<T, F>(&self, user_id: Uuid, op: &'static str, plan: F) -> Result<T>
    where
        F: FnOnce(&PinSet, DateTime<Utc>) -> Result<Transition<T>>,
    {
        let slot = self.slot(user_id).await;
        let mut guard = slot.write().await;

        let mut set = match guard.take() {
            Some(set) => set,
            None => self.load(user_id).await?,
        };
        let result = self.commit(&mut set, op, plan).await;
        *guard = Some(set);

        result
    }

    /// Plans, persists and commits. Memory is only touched after the
    /// repository accepted the changes.
    async fn commit<T, F>(&self, set: &mut PinSet, op: &'static str, plan: F) -> Result<T>
    where
        F: FnOnce(&PinSet, DateTime<Utc>) -> Result<Transition<T>>,
    {
        let user_id = set.user_id();
        let transition = plan(&*set, self.clock.now()).inspect_err(|err| {
            tracing::debug!(%user_id, op, error = %err, "Pin operation rejected");
        })?;

        if transition.is_noop() {
            tracing::trace!(%user_id, op, "Pin operation changed nothing");
            return Ok(transition.outcome);
        }

        if let Err(err) = self
            .repository
            .apply_changes(user_id, &transition.changes)
            .await
        {
            tracing::error!(%user_id, op, error = %err, "Failed to persist pin changes");
            return Err(PinError::Persistence(err));
        }

        set.apply(&transition.changes);
        for change in &transition.changes {
            // No subscribers is fine.
            let _ = self.changes_tx.send(change.clone());
        }

        tracing::debug!(
            %user_id,
            op,
            changes = transition.changes.len(),
            count = set.len(),
            "Applied pin operation"
        );

        Ok(transition.outcome)
    }
}
