//! Application configuration module
//!
//! Resolves every operational mode from environment variables once, at
//! startup, and refuses contradictory combinations.

mod constants;
mod database;
mod email;
mod env;
mod hosts;
mod i18n;
mod settings;

pub use constants::*;
pub use database::{DatabaseConfig, DatabaseMode, PostgresParams};
pub use email::{transport_security, EmailBackend, EmailConfig, TransportSecurity};
pub use env::Env;
pub use hosts::{split_domain, AllowedHosts, TrustedOrigins};
pub use i18n::{I18nConfig, Language};
pub use settings::{
    guard_debug_in_production, AssetsConfig, AuthRedirects, CloudinaryCredentials, Integrations,
    PortalOwner, SecurityPolicy, Settings, SettingsSummary, SiteApp,
};
