use std::cmp::Ordering;
use std::collections::HashSet;

use uuid::Uuid;

use super::error::PinError;
use super::types::PinnedItem;

/// Orders pins by `display_order`, then `pinned_at`, then id.
pub fn compare_display_order(a: &PinnedItem, b: &PinnedItem) -> Ordering {
    a.display_order
        .cmp(&b.display_order)
        .then_with(|| a.pinned_at.cmp(&b.pinned_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts pins in user-visible order.
pub fn sort_by_display_order(pins: &mut [PinnedItem]) {
    pins.sort_by(compare_display_order);
}

/// Returns the display order for a newly created pin.
pub fn next_display_order<'a>(pins: impl IntoIterator<Item = &'a PinnedItem>) -> i32 {
    pins.into_iter()
        .map(|pin| pin.display_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Checks that `ordered_ids` is exactly a permutation of the current pin ids.
pub fn validate_reorder(pins: &[PinnedItem], ordered_ids: &[Uuid]) -> Result<(), PinError> {
    let current: HashSet<Uuid> = pins.iter().map(|pin| pin.id).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());

    for id in ordered_ids {
        if !current.contains(id) {
            return Err(PinError::InvalidReorder(format!("unknown pin id {id}")));
        }
        if !seen.insert(*id) {
            return Err(PinError::InvalidReorder(format!("duplicate pin id {id}")));
        }
    }

    if seen.len() != current.len() {
        return Err(PinError::InvalidReorder(format!(
            "expected {} pin ids, got {}",
            current.len(),
            seen.len()
        )));
    }

    Ok(())
}
