//! Application-wide constants
//!
//! Centralized location for defaults that the environment can override.

// =============================================================================
// Core
// =============================================================================

/// Minimum secret key length accepted outside debug mode
pub const MIN_SECRET_KEY_LENGTH: usize = 32;

/// Insecure key used only when debug is on and no key is provided
pub const DEV_SECRET_KEY: &str = "dev-insecure-secret-key-do-not-deploy!!";

/// Default listener host
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default listener port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// Hosts & Origins
// =============================================================================

/// Hostnames always accepted, whatever the environment says
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "theenglishstudiocorvetto.onrender.com",
    "theenglishstudiocorvetto.com",
    "www.theenglishstudiocorvetto.com",
    "localhost",
    "127.0.0.1",
];

/// Origins always trusted for unsafe cross-origin requests
pub const DEFAULT_TRUSTED_ORIGINS: &[&str] = &[
    "https://theenglishstudiocorvetto.com",
    "https://*.onrender.com",
];

/// Forwarding domain of the cloud IDE, allowed alongside its hostname
pub const CLOUD_IDE_FORWARDING_DOMAIN: &str = ".app.github.dev";

// =============================================================================
// Security
// =============================================================================

/// HSTS max-age in seconds (one year)
pub const HSTS_SECONDS: u64 = 31_536_000;

/// Referrer policy sent with every response
pub const REFERRER_POLICY: &str = "same-origin";

/// Cross-origin opener policy sent with every response
pub const CROSS_ORIGIN_OPENER_POLICY: &str = "same-origin";

// =============================================================================
// Database
// =============================================================================

/// SQLite file name, relative to the base directory
pub const SQLITE_FILE_NAME: &str = "db.sqlite3";

/// Connection lifetime for the managed Postgres database, in seconds
pub const MANAGED_DB_CONN_MAX_AGE_SECONDS: u64 = 600;

/// Default local Postgres host
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default local Postgres port
pub const DEFAULT_DB_PORT: u16 = 5432;

// =============================================================================
// Email
// =============================================================================

/// Default SMTP relay (STARTTLS on 587)
pub const DEFAULT_EMAIL_HOST: &str = "smtp.gmail.com";

/// Default SMTP port
pub const DEFAULT_EMAIL_PORT: u16 = 587;

/// Default SMTP timeout in seconds
pub const DEFAULT_EMAIL_TIMEOUT_SECONDS: u64 = 20;

/// Sender used when neither a from address nor an SMTP user is configured
pub const FALLBACK_FROM_EMAIL: &str = "webmaster@localhost";

// =============================================================================
// Internationalization
// =============================================================================

/// Language used when negotiation finds nothing better
pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported languages as (code, display name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("it", "Italian")];

/// Cookie holding the visitor's chosen language
pub const LANGUAGE_COOKIE_NAME: &str = "site_language";

/// Lifetime of the language cookie in seconds (one year)
pub const LANGUAGE_COOKIE_MAX_AGE_SECONDS: i64 = 31_536_000;

/// Server time zone
pub const TIME_ZONE: &str = "UTC";

/// Translation catalogues directory, relative to the base directory
pub const LOCALE_DIR_NAME: &str = "locale";

// =============================================================================
// Static & Media
// =============================================================================

/// URL prefix of collected static assets
pub const STATIC_URL: &str = "/static/";

/// Collected static assets directory, relative to the base directory
pub const STATIC_ROOT_NAME: &str = "staticfiles";

/// Length of the content hash in collected file names (`base.4c16c7f3156b.js`)
pub const STATIC_HASH_LENGTH: usize = 12;

/// Cache policy for content-hashed static files
pub const STATIC_IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=315360000, immutable";

/// Cache policy for static files without a content hash
pub const STATIC_DEFAULT_CACHE_CONTROL: &str = "public, max-age=60";

/// URL prefix of user-uploaded media
pub const MEDIA_URL: &str = "/media/";

/// Local media directory, relative to the base directory
pub const MEDIA_ROOT_NAME: &str = "media";

// =============================================================================
// Auth & Sessions
// =============================================================================

/// Portal login page
pub const LOGIN_URL: &str = "/portal/login/";

/// Named route visited after login
pub const LOGIN_REDIRECT_ROUTE: &str = "portal:dashboard";

/// Named route visited after logout
pub const LOGOUT_REDIRECT_ROUTE: &str = "portal:login";

/// Signed cookie carrying the portal session
pub const PORTAL_SESSION_COOKIE: &str = "portal_session";

/// Signed cookie carrying a one-shot flash message
pub const FLASH_COOKIE: &str = "flash";
