//! Fitting simulation CLI library.
//!
//! Catalog discovery and the handlers behind each subcommand. `main.rs`
//! only parses arguments and dispatches here.

pub mod commands;
pub mod config;
