//! HTTP request handlers, one module per content app.

pub mod admin;
pub mod blog;
pub mod contact;
pub mod flyers;
pub mod gallery;
pub mod health;
pub mod main;
pub mod portal;
pub mod schedule;

use axum::response::Response;

/// Process-wide "not found" handler.
pub const HANDLER_404: fn() -> Response = main::not_found;

/// Process-wide "server error" handler.
pub const HANDLER_500: fn() -> Response = main::server_error;
