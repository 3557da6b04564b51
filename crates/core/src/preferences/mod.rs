mod error;
mod traits;
mod types;

pub use error::{PreferenceError, Result};
pub use traits::PreferenceStore;
pub use types::{
    incoming_wins, validate_key, PreferenceChange, StoredPreference, MAX_KEY_LEN,
};
