//! The English Studio website backbone.
//!
//! Environment-driven settings and a locale-prefixed route table served
//! with Axum.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Settings resolved from the environment and constants
//! - **infra**: Database connection and mail transports
//! - **api**: Route table, handlers, middleware and language switching
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Print the resolved settings without secrets
//! cargo run -- check --json
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState, RouteTable};
pub use config::Settings;
pub use errors::{AppError, AppResult, ConfigError};
