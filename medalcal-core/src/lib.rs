//! Core of medalcal.
//!
//! This crate holds everything that doesn't talk to the network:
//! - `event` and `palette` for the typed event records
//! - `rules` for the title-pattern rule table
//! - `diff`, `snapshot` and `executor` for the reconciliation pass
//! - `light` for picking a light color from in-progress events
//!
//! Transports implement the traits in `remote`.

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod executor;
pub mod filter;
pub mod light;
pub mod palette;
pub mod reconcile;
pub mod remote;
pub mod retry;
pub mod rules;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use error::{CoreError, CoreResult, RemoteError};
pub use event::*;
pub use palette::Color;
