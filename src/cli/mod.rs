//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `check` - Validate the environment and print the resolved settings

pub mod args;

pub use args::{CheckArgs, Cli, Commands, ServeArgs};
