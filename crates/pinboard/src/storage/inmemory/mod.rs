//! In-memory storage backend.
//!
//! Pins are kept in HashMaps wrapped in `Arc<RwLock<_>>`. Nothing survives
//! the process, which makes this backend the default for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use pinboard::storage::inmemory::{InMemoryEntityRegistry, InMemoryRepository};
//!
//! let repo = InMemoryRepository::new();
//! let registry = InMemoryEntityRegistry::new();
//! ```

mod entities;
mod repository;

pub use entities::InMemoryEntityRegistry;
pub use repository::InMemoryRepository;
