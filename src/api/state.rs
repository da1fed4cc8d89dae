//! Application state - Dependency injection container.
//!
//! Shared, read-only after startup: settings, route table, mail transport,
//! database and the signing key for cookies.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::table::RouteTable;
use crate::config::Settings;
use crate::errors::AppResult;
use crate::infra::{build_mailer, Database, Mailer};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub routes: Arc<RouteTable>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` only when running without a database (tests, `check`)
    pub database: Option<Arc<Database>>,
    cookie_key: Key,
}

impl AppState {
    /// Create application state with the configured mail transport.
    pub fn from_settings(settings: Settings, database: Option<Arc<Database>>) -> AppResult<Self> {
        let mailer = build_mailer(&settings.email)?;
        Ok(Self::new(settings, mailer, database))
    }

    /// Create application state with a manually injected mailer.
    pub fn new(
        settings: Settings,
        mailer: Arc<dyn Mailer>,
        database: Option<Arc<Database>>,
    ) -> Self {
        let routes = RouteTable::from_settings(&settings);
        // Secret keys are validated to at least 32 bytes at load time
        let cookie_key = Key::derive_from(settings.secret_key_bytes());

        Self {
            settings: Arc::new(settings),
            routes: Arc::new(routes),
            mailer,
            database,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
