//! CLI command implementations for diskstat-api.
//!
//! This module provides implementations for all CLI subcommands:
//! - `query`: One-shot disk statistics lookup
//! - `check`: Configuration and command validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod query;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use query::command_query;
