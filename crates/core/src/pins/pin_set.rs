//! One user's pin set and its pure transitions.
//!
//! Every operation is planned against the current set without mutating it.
//! The resulting [`Transition`] carries the changes to persist; the caller
//! commits them with [`PinSet::apply`] once persistence succeeded, so a
//! failed write never leaves memory ahead of storage.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::PinError;
use super::eviction::{expired_pins, select_eviction_candidate};
use super::ordering::{next_display_order, sort_by_display_order, validate_reorder};
use super::policy::PinPolicy;
use super::staleness::is_stale;
use super::types::{EntityRef, EvictedPin, EvictionReason, PinChange, PinView, PinnedItem};

/// The planned outcome of an operation plus the changes that realize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<T> {
    pub changes: Vec<PinChange>,
    pub outcome: T,
}

impl<T> Transition<T> {
    fn new(changes: Vec<PinChange>, outcome: T) -> Self {
        Self { changes, outcome }
    }

    /// Returns true if applying this transition changes nothing.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Outcome of a successful pin plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinOutcome {
    pub pin: PinnedItem,
    /// The pin removed to make room, if the set was at capacity.
    pub evicted: Option<EvictedPin>,
}

/// The active pins of a single user, kept in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSet {
    user_id: Uuid,
    pins: Vec<PinnedItem>,
}

impl PinSet {
    /// Creates an empty pin set.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            pins: Vec::new(),
        }
    }

    /// Builds a pin set from persisted rows.
    ///
    /// Rows belonging to other users and repeated logical keys are dropped
    /// (the first in display order is kept). A `last_accessed_at` earlier than
    /// `pinned_at` is clamped up to it. Returns the set and the number of
    /// dropped rows.
    pub fn from_pins(user_id: Uuid, mut pins: Vec<PinnedItem>) -> (Self, usize) {
        let total = pins.len();
        sort_by_display_order(&mut pins);

        let mut kept: Vec<PinnedItem> = Vec::with_capacity(pins.len());
        for pin in pins {
            if pin.user_id != user_id {
                continue;
            }
            let entity = pin.entity();
            if kept.iter().any(|p| p.references(&entity) || p.id == pin.id) {
                continue;
            }
            let last_accessed_at = pin.last_accessed_at;
            kept.push(pin.with_last_accessed_at(last_accessed_at));
        }

        let dropped = total - kept.len();
        (
            Self {
                user_id,
                pins: kept,
            },
            dropped,
        )
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the pins in display order.
    pub fn pins(&self) -> &[PinnedItem] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Finds the pin referencing the given entity.
    pub fn find(&self, entity: &EntityRef) -> Option<&PinnedItem> {
        self.pins.iter().find(|pin| pin.references(entity))
    }

    fn require(&self, entity: &EntityRef) -> Result<&PinnedItem, PinError> {
        self.find(entity).ok_or(PinError::NotFound {
            entity_type: entity.entity_type,
            entity_id: entity.entity_id,
        })
    }

    /// Plans pinning an entity.
    ///
    /// At capacity, the single most eligible auto-unpin candidate is evicted
    /// in the same transition. If none qualifies the plan fails with
    /// [`PinError::CapacityExceeded`].
    pub fn plan_pin(
        &self,
        entity: EntityRef,
        now: DateTime<Utc>,
        policy: &PinPolicy,
    ) -> Result<Transition<PinOutcome>, PinError> {
        if self.find(&entity).is_some() {
            return Err(PinError::DuplicatePin {
                entity_type: entity.entity_type,
                entity_id: entity.entity_id,
            });
        }

        let mut changes = Vec::with_capacity(2);
        let mut evicted = None;

        if self.pins.len() >= policy.max_pins {
            // Only one slot may be freed automatically.
            let candidate = if self.pins.len() == policy.max_pins {
                select_eviction_candidate(&self.pins, now, policy)
            } else {
                None
            };
            let Some(candidate) = candidate else {
                return Err(PinError::CapacityExceeded {
                    max_pins: policy.max_pins,
                });
            };
            changes.push(PinChange::Deleted(candidate.clone()));
            evicted = Some(EvictedPin {
                pin: candidate.clone(),
                reason: EvictionReason::AutoExpired,
            });
        }

        let evicted_id = evicted.as_ref().map(|e| e.pin.id);
        let display_order =
            next_display_order(self.pins.iter().filter(|pin| Some(pin.id) != evicted_id));
        let pin = PinnedItem::new(self.user_id, entity, display_order, now);
        changes.push(PinChange::Created(pin.clone()));

        Ok(Transition::new(changes, PinOutcome { pin, evicted }))
    }

    /// Plans removing the pin for an entity. Other display orders are untouched.
    pub fn plan_unpin(&self, entity: &EntityRef) -> Result<Transition<PinnedItem>, PinError> {
        let pin = self.require(entity)?.clone();
        Ok(Transition::new(vec![PinChange::Deleted(pin.clone())], pin))
    }

    /// Plans recording an access to the pinned entity.
    ///
    /// Only `last_accessed_at` moves, and never backwards.
    pub fn plan_touch(
        &self,
        entity: &EntityRef,
        now: DateTime<Utc>,
    ) -> Result<Transition<PinnedItem>, PinError> {
        let current = self.require(entity)?;
        let touched = current.clone().with_last_accessed_at(now.max(current.last_accessed_at));

        if touched == *current {
            return Ok(Transition::new(Vec::new(), touched));
        }
        Ok(Transition::new(vec![PinChange::Updated(touched.clone())], touched))
    }

    /// Plans assigning display orders `0..N-1` following `ordered_ids`.
    ///
    /// `ordered_ids` must be exactly the ids of the current pins.
    pub fn plan_reorder(&self, ordered_ids: &[Uuid]) -> Result<Transition<Vec<PinnedItem>>, PinError> {
        validate_reorder(&self.pins, ordered_ids)?;

        let mut changes = Vec::new();
        let mut reordered = Vec::with_capacity(ordered_ids.len());

        for (position, id) in ordered_ids.iter().enumerate() {
            let Some(current) = self.pins.iter().find(|pin| pin.id == *id) else {
                return Err(PinError::InvalidReorder(format!("unknown pin id {id}")));
            };
            let display_order = i32::try_from(position)
                .map_err(|_| PinError::InvalidReorder("too many pins".to_string()))?;

            let mut pin = current.clone();
            if pin.display_order != display_order {
                pin.display_order = display_order;
                changes.push(PinChange::Updated(pin.clone()));
            }
            reordered.push(pin);
        }

        Ok(Transition::new(changes, reordered))
    }

    /// Plans removing every auto-unpin eligible pin.
    pub fn plan_sweep(&self, now: DateTime<Utc>, policy: &PinPolicy) -> Transition<Vec<EvictedPin>> {
        let expired = expired_pins(&self.pins, now, policy);

        let changes = expired
            .iter()
            .map(|pin| PinChange::Deleted((*pin).clone()))
            .collect();
        let evicted = expired
            .into_iter()
            .map(|pin| EvictedPin {
                pin: pin.clone(),
                reason: EvictionReason::AutoExpired,
            })
            .collect();

        Transition::new(changes, evicted)
    }

    /// Returns the pins in display order with staleness computed at `now`.
    ///
    /// `is_dangling` is always false here; the entity check belongs to the host.
    pub fn views(&self, now: DateTime<Utc>, policy: &PinPolicy) -> Vec<PinView> {
        self.pins
            .iter()
            .map(|pin| PinView {
                pin: pin.clone(),
                is_stale: is_stale(pin, now, policy),
                is_dangling: false,
            })
            .collect()
    }

    /// Commits changes produced by a plan on this set.
    pub fn apply(&mut self, changes: &[PinChange]) {
        for change in changes {
            match change {
                PinChange::Created(pin) => self.pins.push(pin.clone()),
                PinChange::Updated(pin) => {
                    if let Some(slot) = self.pins.iter_mut().find(|p| p.id == pin.id) {
                        *slot = pin.clone();
                    }
                }
                PinChange::Deleted(pin) => self.pins.retain(|p| p.id != pin.id),
            }
        }
        sort_by_display_order(&mut self.pins);
    }
}
