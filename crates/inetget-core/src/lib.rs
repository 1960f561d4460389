//! The transfer core: a command-driven single-resource transfer agent.
//!
//! Given a [`types::Url`] and a [`types::Params`] record, [`orchestrator::run_transfer`]
//! opens a client connection for the URL's scheme, negotiates a protocol-level
//! request, streams the response body to a [`sink::Sink`], and reports structured
//! progress and outcomes through a [`listener::StatusListener`].
//!
//! This crate deliberately knows nothing about argument parsing, config
//! files, or how a `Url`/`Params` pair was produced — that's `inetget-cli`'s
//! job. It only consumes the two records and drives the transfer.

pub mod client;
pub mod error;
pub mod listener;
pub mod orchestrator;
pub mod progress;
pub mod sink;
pub mod sync;
pub mod timer;
pub mod types;
pub mod urlencode;

pub use error::{CoreError, Result};
