//! Ambient stack shared by `inetget-core` and `inetget-cli`.
//!
//! This crate carries the cross-cutting concerns that aren't part of the
//! transfer core itself: a small shared error enum for plumbing failures
//! that don't belong to any one protocol client, and the logging
//! subsystem used by every binary and library in the workspace.

pub mod error;
pub mod logging;

pub use error::{CommonError, Result};
