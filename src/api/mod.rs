//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - The localized route table and the handlers it mounts
//! - Middleware (allowed hosts, transport security, CSRF origin checks)
//! - Custom extractors
//! - Language switching and flash messages

pub mod assets;
pub mod extractors;
pub mod handlers;
pub mod locale;
pub mod messages;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod state;
pub mod table;

pub use routes::create_router;
pub use state::AppState;
pub use table::{Resolution, RouteTable};
