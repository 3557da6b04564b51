//! Preference store implementations.

mod memory;

pub use memory::MemoryPreferenceStore;
