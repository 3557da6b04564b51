//! Storage backend implementations.
//!
//! Concrete implementations of the collaborator traits defined in
//! `pinboard_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always compiled in; tests and embedding hosts
//! without a database use it.
//!
//! Build without SQLite:
//! ```bash
//! cargo build -p pinboard --lib --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::{InMemoryEntityRegistry, InMemoryRepository};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
