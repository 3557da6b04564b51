//! Pin store.
//!
//! [`PinStore`] owns the in-memory pin sets of every active user and applies
//! pin operations as atomic transitions. Each user's set sits behind its own
//! lock, so different users never wait on each other while operations on
//! one user are fully serialized.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pinboard::storage::inmemory::InMemoryRepository;
//! use pinboard::PinStore;
//! use pinboard_core::pins::{EntityRef, EntityType, PinPolicy};
//!
//! let store = PinStore::new(Arc::new(InMemoryRepository::new()), PinPolicy::default());
//! let pin = store.pin(user_id, EntityRef::new(EntityType::Task, task_id)).await?;
//! ```

mod pin_store;

pub use pin_store::PinStore;
