//! pinboard_core - Functional core of the pinboard pin policy engine.
//!
//! Everything in this crate is pure: types, policy functions and the
//! per-user [`pins::PinSet`] transitions. I/O lives behind the collaborator
//! traits in [`storage`], [`clock`] and [`preferences`].

pub mod clock;
pub mod pins;
pub mod preferences;
pub mod storage;
