use thiserror::Error;

/// Errors that can occur during preference store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Invalid preference key: {0:?}")]
    InvalidKey(String),
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for preference operations.
pub type Result<T> = std::result::Result<T, PreferenceError>;
