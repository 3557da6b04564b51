use thiserror::Error;
use uuid::Uuid;

use crate::storage::RepositoryError;

use super::types::EntityType;

/// Errors returned by pin operations.
///
/// Every variant is recoverable: a failed operation leaves the pin set as it
/// was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("{entity_type} {entity_id} is already pinned")]
    DuplicatePin {
        entity_type: EntityType,
        entity_id: Uuid,
    },
    #[error("No pin found for {entity_type} {entity_id}")]
    NotFound {
        entity_type: EntityType,
        entity_id: Uuid,
    },
    #[error("Pin limit reached ({max_pins} pins)")]
    CapacityExceeded { max_pins: usize },
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

impl PinError {
    /// Returns the action a user can take to resolve this error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            PinError::CapacityExceeded { .. } => Some("Unpin something else and try again"),
            PinError::DuplicatePin { .. } => Some("Already pinned"),
            _ => None,
        }
    }
}

/// Errors that can occur when validating a pin policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Pin capacity must be at least 1")]
    ZeroCapacity,
    #[error("{0} threshold must be at least 1 day")]
    ZeroThreshold(&'static str),
}
