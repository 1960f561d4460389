//! INetGet CLI
//!
//! Command-line front end for the transfer core: parses arguments and an
//! optional config file into a `(Url, Params)` pair, wires up the console
//! title and Ctrl-C bootstrap, and drives `inetget_core::orchestrator`.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod notify;
pub mod params;
pub mod url;

pub use error::{CliError, Result};
