//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fabula binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{report_error, run_command};
