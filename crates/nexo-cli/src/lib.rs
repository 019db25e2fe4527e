//! # nexo-cli
//!
//! The `nexo` command surface: argument parsing, the persisted session,
//! item addressing by name or id, and table/JSON output.

pub mod commands;
pub mod context;
pub mod output;
pub mod resolve;
pub mod session;

#[cfg(test)]
mod testing;

pub use commands::Cli;
pub use context::CliContext;
