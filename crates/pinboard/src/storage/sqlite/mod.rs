//! SQLite storage backend implementation.
//!
//! Implements [`PinRepository`](pinboard_core::storage::PinRepository) using
//! `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping. Each change batch runs in a single transaction.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
