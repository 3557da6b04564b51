use chrono::{DateTime, Utc};

use super::ordering::compare_display_order;
use super::policy::PinPolicy;
use super::staleness::is_auto_unpin_eligible;
use super::types::PinnedItem;

/// Selects the single pin to evict when a slot must be freed.
///
/// Only auto-unpin eligible pins qualify. Among those, the oldest
/// `last_accessed_at` wins, ties broken by the smallest `display_order`.
/// Returns `None` when no pin is eligible; stale pins below the auto-unpin
/// threshold are never selected.
pub fn select_eviction_candidate<'a>(
    pins: &'a [PinnedItem],
    now: DateTime<Utc>,
    policy: &PinPolicy,
) -> Option<&'a PinnedItem> {
    pins.iter()
        .filter(|pin| is_auto_unpin_eligible(pin, now, policy))
        .min_by(|a, b| {
            a.last_accessed_at
                .cmp(&b.last_accessed_at)
                .then_with(|| compare_display_order(a, b))
        })
}

/// Returns every auto-unpin eligible pin, in display order.
pub fn expired_pins<'a>(
    pins: &'a [PinnedItem],
    now: DateTime<Utc>,
    policy: &PinPolicy,
) -> Vec<&'a PinnedItem> {
    let mut expired: Vec<&PinnedItem> = pins
        .iter()
        .filter(|pin| is_auto_unpin_eligible(pin, now, policy))
        .collect();
    expired.sort_by(|a, b| compare_display_order(a, b));
    expired
}
