#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement session state machine.
//!
//! The [`PlacementManager`] owns the session, reacts to permission grants and
//! revocations from the server, resolves the granted placement option through
//! the [`ModeRegistry`](placement_system_modes::ModeRegistry), drives the
//! resulting strategy once per frame and turns user commits into outbound
//! requests. Everything runs to completion on the caller's thread.

mod config;
mod frame;
mod manager;

pub use config::{ConfigError, PlacementConfig};
pub use manager::{Collaborators, PlacementManager, PlacementSession, SessionState};
