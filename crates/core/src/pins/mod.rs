mod error;
mod eviction;
mod http_mapping;
mod ordering;
mod pin_set;
mod policy;
mod staleness;
mod types;

pub use error::{PinError, PolicyError};
pub use eviction::{expired_pins, select_eviction_candidate};
pub use http_mapping::pin_error_to_status_code;
pub use ordering::{
    compare_display_order, next_display_order, sort_by_display_order, validate_reorder,
};
pub use pin_set::{PinOutcome, PinSet, Transition};
pub use policy::{PinPolicy, AUTO_UNPIN_THRESHOLD_DAYS, MAX_PINS, STALE_THRESHOLD_DAYS};
pub use staleness::{idle_duration, is_auto_unpin_eligible, is_stale};
pub use types::{
    EntityRef, EntityType, EvictedPin, EvictionReason, PinChange, PinView, PinnedItem,
};

/// Result type for pin operations.
pub type Result<T> = std::result::Result<T, PinError>;
