//! Core domain + pipeline logic for the document watcher.
//!
//! This crate is intentionally platform-agnostic. The headless renderer and
//! the chat platform live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod diff;
pub mod domain;
pub mod enrich;
pub mod errors;
pub mod logging;
pub mod notify;
pub mod parser;
pub mod ports;
pub mod snapshot;
pub mod watcher;

pub use errors::{Error, Result};
