//! Pure functions for mapping pin errors to HTTP status codes.

use crate::storage::RepositoryError;

use super::PinError;

/// Maps a [`PinError`] to an HTTP status code.
///
/// - `DuplicatePin` -> 409 (Conflict)
/// - `CapacityExceeded` -> 409 (Conflict)
/// - `NotFound` -> 404 (Not Found)
/// - `InvalidReorder`, `InvalidEntityType` -> 400 (Bad Request)
/// - `Persistence` -> depends on the repository error
///
/// # Examples
///
/// ```
/// use pinboard_core::pins::{PinError, pin_error_to_status_code};
///
/// let error = PinError::CapacityExceeded { max_pins: 7 };
/// assert_eq!(pin_error_to_status_code(&error), 409);
/// ```
pub fn pin_error_to_status_code(error: &PinError) -> u16 {
    match error {
        PinError::DuplicatePin { .. } | PinError::CapacityExceeded { .. } => 409,
        PinError::NotFound { .. } => 404,
        PinError::InvalidReorder(_) | PinError::InvalidEntityType(_) => 400,
        PinError::Persistence(err) => match err {
            RepositoryError::NotFound { .. } => 404,
            RepositoryError::AlreadyExists { .. } => 409,
            RepositoryError::ConnectionFailed(_) => 503,
            RepositoryError::InvalidData(_) => 400,
            RepositoryError::QueryFailed(_) | RepositoryError::Serialization(_) => 500,
        },
    }
}
