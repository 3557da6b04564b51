//! pinboard - Pinned-item store for the pinboard project.
//!
//! The imperative shell around `pinboard_core`: per-user locking,
//! persistence round trips, storage backends, preferences and configuration.

pub mod cli;
pub mod config;
pub mod output;
pub mod preferences;
pub mod storage;
pub mod store;

pub use config::Config;
pub use store::PinStore;
