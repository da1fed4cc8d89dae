//! Application settings loaded from environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::constants::{
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_SECRET_KEY, HSTS_SECONDS, LOGIN_REDIRECT_ROUTE,
    LOGIN_URL, LOGOUT_REDIRECT_ROUTE, MEDIA_ROOT_NAME, MEDIA_URL, MIN_SECRET_KEY_LENGTH,
    STATIC_ROOT_NAME, STATIC_URL,
};
use super::database::{DatabaseConfig, DatabaseMode};
use super::email::{EmailBackend, EmailConfig, TransportSecurity};
use super::env::Env;
use super::hosts::{AllowedHosts, TrustedOrigins};
use super::i18n::I18nConfig;
use crate::errors::ConfigError;

/// Content apps the site can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteApp {
    Main,
    Contact,
    Gallery,
    Admin,
    Blog,
    Schedule,
    Portal,
    Flyers,
}

impl SiteApp {
    pub fn label(self) -> &'static str {
        match self {
            SiteApp::Main => "main",
            SiteApp::Contact => "contact",
            SiteApp::Gallery => "gallery",
            SiteApp::Admin => "admin",
            SiteApp::Blog => "blog",
            SiteApp::Schedule => "schedule",
            SiteApp::Portal => "portal",
            SiteApp::Flyers => "flyers",
        }
    }
}

/// Transport hardening applied outside debug mode.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityPolicy {
    pub ssl_redirect: bool,
    pub secure_cookies: bool,
    pub hsts_seconds: u64,
    pub hsts_include_subdomains: bool,
    pub hsts_preload: bool,
    /// Trust `X-Forwarded-Proto: https` from the hosting proxy
    pub trust_forwarded_proto: bool,
    /// Use `X-Forwarded-Host` as the request host
    pub use_forwarded_host: bool,
}

impl SecurityPolicy {
    pub fn for_mode(debug: bool) -> Self {
        Self {
            ssl_redirect: !debug,
            secure_cookies: !debug,
            hsts_seconds: if debug { 0 } else { HSTS_SECONDS },
            hsts_include_subdomains: !debug,
            hsts_preload: !debug,
            trust_forwarded_proto: true,
            use_forwarded_host: true,
        }
    }

    /// `Strict-Transport-Security` value, `None` when HSTS is off.
    pub fn hsts_header(&self) -> Option<String> {
        if self.hsts_seconds == 0 {
            return None;
        }
        let mut value = format!("max-age={}", self.hsts_seconds);
        if self.hsts_include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.hsts_preload {
            value.push_str("; preload");
        }
        Some(value)
    }
}

/// Static asset and uploaded media locations.
#[derive(Debug, Clone, Serialize)]
pub struct AssetsConfig {
    pub static_url: String,
    pub static_root: PathBuf,
    pub media_url: String,
    pub media_root: PathBuf,
}

/// Image hosting credentials for production media.
#[derive(Clone, Default)]
pub struct CloudinaryCredentials {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    api_secret: Option<String>,
}

impl CloudinaryCredentials {
    pub fn is_configured(&self) -> bool {
        self.cloud_name.is_some() && self.api_key.is_some() && self.api_secret.is_some()
    }
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Third-party API credentials.
#[derive(Clone, Default)]
pub struct Integrations {
    pub google_maps_api_key: String,
    mailchimp_api_key: String,
    pub mailchimp_audience_id: String,
    pub cloudinary: CloudinaryCredentials,
}

impl Integrations {
    pub fn mailchimp_configured(&self) -> bool {
        !self.mailchimp_api_key.is_empty() && !self.mailchimp_audience_id.is_empty()
    }
}

impl fmt::Debug for Integrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrations")
            .field("google_maps_api_key", &"[REDACTED]")
            .field("mailchimp_api_key", &"[REDACTED]")
            .field("mailchimp_audience_id", &self.mailchimp_audience_id)
            .field("cloudinary", &self.cloudinary)
            .finish()
    }
}

/// Identity of the portal owner, normalized to lowercase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortalOwner {
    pub username: String,
    pub email: String,
}

/// Where login and logout send the visitor.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRedirects {
    pub login_url: String,
    pub login_redirect: String,
    pub logout_redirect: String,
}

/// Application configuration
#[derive(Clone)]
pub struct Settings {
    pub base_dir: PathBuf,
    secret_key: String,
    pub debug: bool,
    pub server_host: String,
    pub server_port: u16,
    pub security: SecurityPolicy,
    pub allowed_hosts: AllowedHosts,
    pub csrf_trusted_origins: TrustedOrigins,
    pub installed_apps: Vec<SiteApp>,
    pub auth: AuthRedirects,
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub i18n: I18nConfig,
    pub assets: AssetsConfig,
    pub integrations: Integrations,
    pub portal_owner: PortalOwner,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_dir", &self.base_dir)
            .field("secret_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("installed_apps", &self.installed_apps)
            .field("database", &self.database)
            .field("email", &self.email)
            .field("integrations", &self.integrations)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Load configuration from the process environment (and `.env`).
    ///
    /// The base directory is `BASE_DIR` when set, else the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Env::from_process();
        let base_dir = match env.non_empty("BASE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()
                .map_err(|e| ConfigError::invalid("BASE_DIR", "", e.to_string()))?,
        };
        Self::from_source(&env, &base_dir)
    }

    /// Resolve every setting from an environment snapshot.
    pub fn from_source(env: &Env, base_dir: &Path) -> Result<Self, ConfigError> {
        let debug = env.flag("DEBUG", false);

        // Refuse a debug build wired to production resources
        guard_debug_in_production(env, debug)?;

        let secret_key = resolve_secret_key(env, debug)?;
        let database = DatabaseConfig::from_env(env, base_dir)?;
        let email = EmailConfig::from_env(env, debug)?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            secret_key,
            debug,
            server_host: env.string_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: env.parse_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            security: SecurityPolicy::for_mode(debug),
            allowed_hosts: AllowedHosts::from_env(env, debug),
            csrf_trusted_origins: TrustedOrigins::from_env(env),
            installed_apps: installed_apps(env),
            auth: AuthRedirects {
                login_url: LOGIN_URL.to_string(),
                login_redirect: LOGIN_REDIRECT_ROUTE.to_string(),
                logout_redirect: LOGOUT_REDIRECT_ROUTE.to_string(),
            },
            database,
            email,
            i18n: I18nConfig::new(base_dir),
            assets: AssetsConfig {
                static_url: STATIC_URL.to_string(),
                static_root: base_dir.join(STATIC_ROOT_NAME),
                media_url: MEDIA_URL.to_string(),
                media_root: base_dir.join(MEDIA_ROOT_NAME),
            },
            integrations: Integrations {
                google_maps_api_key: env.string_or("GOOGLE_MAPS_API_KEY", ""),
                mailchimp_api_key: env.string_or("MAILCHIMP_API_KEY", ""),
                mailchimp_audience_id: env.string_or("MAILCHIMP_AUDIENCE_ID", ""),
                cloudinary: CloudinaryCredentials {
                    cloud_name: env.non_empty("CLOUDINARY_CLOUD_NAME").map(str::to_string),
                    api_key: env.non_empty("CLOUDINARY_API_KEY").map(str::to_string),
                    api_secret: env.non_empty("CLOUDINARY_API_SECRET").map(str::to_string),
                },
            },
            portal_owner: PortalOwner {
                username: env.string_or("PORTAL_OWNER_USERNAME", "").trim().to_lowercase(),
                email: env.string_or("PORTAL_OWNER_EMAIL", "").trim().to_lowercase(),
            },
        })
    }

    /// Key material for signed cookies.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    pub fn is_installed(&self, app: SiteApp) -> bool {
        self.installed_apps.contains(&app)
    }

    /// Default log filter: verbose in debug, warnings only in production.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Secret-free overview of the resolved settings.
    pub fn summary(&self) -> SettingsSummary {
        SettingsSummary {
            debug: self.debug,
            server_addr: self.server_addr(),
            database: self.database.mode(),
            email_backend: self.email.backend,
            email_security: self.email.security,
            allowed_hosts: self.allowed_hosts.iter().map(str::to_string).collect(),
            csrf_trusted_origins: self
                .csrf_trusted_origins
                .iter()
                .map(str::to_string)
                .collect(),
            installed_apps: self.installed_apps.clone(),
            languages: self.i18n.codes().map(str::to_string).collect(),
            serves_local_assets: self.debug,
            cloudinary_configured: self.integrations.cloudinary.is_configured(),
            mailchimp_configured: self.integrations.mailchimp_configured(),
            maps_configured: !self.integrations.google_maps_api_key.is_empty(),
        }
    }
}

/// Output of the `check` command.
#[derive(Debug, Serialize)]
pub struct SettingsSummary {
    pub debug: bool,
    pub server_addr: String,
    pub database: DatabaseMode,
    pub email_backend: EmailBackend,
    pub email_security: TransportSecurity,
    pub allowed_hosts: Vec<String>,
    pub csrf_trusted_origins: Vec<String>,
    pub installed_apps: Vec<SiteApp>,
    pub languages: Vec<String>,
    pub serves_local_assets: bool,
    pub cloudinary_configured: bool,
    pub mailchimp_configured: bool,
    pub maps_configured: bool,
}

/// Debug must never run against the hosting provider or a managed database.
pub fn guard_debug_in_production(env: &Env, debug: bool) -> Result<(), ConfigError> {
    if debug && env.is_set("RENDER") {
        return Err(ConfigError::DebugWithHostingProvider);
    }
    if debug && env.is_set("DATABASE_URL") {
        return Err(ConfigError::DebugWithDatabaseUrl);
    }
    Ok(())
}

fn resolve_secret_key(env: &Env, debug: bool) -> Result<String, ConfigError> {
    let secret_key = match env.non_empty("DJANGO_SECRET_KEY") {
        Some(key) => key.to_string(),
        None if debug => {
            tracing::warn!("DJANGO_SECRET_KEY not set, using insecure default for development");
            DEV_SECRET_KEY.to_string()
        }
        None => return Err(ConfigError::MissingSecretKey),
    };

    if secret_key.len() < MIN_SECRET_KEY_LENGTH {
        return Err(ConfigError::SecretKeyTooShort {
            min: MIN_SECRET_KEY_LENGTH,
        });
    }
    Ok(secret_key)
}

fn installed_apps(env: &Env) -> Vec<SiteApp> {
    let schedule_disabled = env.flag("DISABLE_SCHEDULE", false);
    [
        SiteApp::Main,
        SiteApp::Contact,
        SiteApp::Gallery,
        SiteApp::Admin,
        SiteApp::Blog,
        SiteApp::Schedule,
        SiteApp::Portal,
        SiteApp::Flyers,
    ]
    .into_iter()
    .filter(|app| !(schedule_disabled && *app == SiteApp::Schedule))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "a-production-secret-key-that-is-long-enough";

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        Settings::from_source(&Env::from_pairs(pairs.iter().copied()), Path::new("/srv/site"))
    }

    #[test]
    fn test_debug_guard_for_all_marker_combinations() {
        for debug in [false, true] {
            for render in [None, Some("true")] {
                for url in [None, Some("postgres://u:p@db/x")] {
                    let env = Env::from_pairs(
                        [
                            Some(("DEBUG", if debug { "true" } else { "false" })),
                            render.map(|v| ("RENDER", v)),
                            url.map(|v| ("DATABASE_URL", v)),
                        ]
                        .into_iter()
                        .flatten(),
                    );
                    let aborted = guard_debug_in_production(&env, debug).is_err();
                    let expected = debug && (render.is_some() || url.is_some());
                    assert_eq!(aborted, expected, "debug={} render={:?} url={:?}", debug, render, url);
                }
            }
        }
    }

    #[test]
    fn test_debug_guard_aborts_settings_load() {
        let err = load(&[("DEBUG", "true"), ("RENDER", "1")]).unwrap_err();
        assert_eq!(err, ConfigError::DebugWithHostingProvider);

        let err = load(&[("DEBUG", "true"), ("DATABASE_URL", "postgres://x")]).unwrap_err();
        assert_eq!(err, ConfigError::DebugWithDatabaseUrl);
    }

    #[test]
    fn test_production_requires_strong_secret() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingSecretKey);
        assert!(matches!(
            load(&[("DJANGO_SECRET_KEY", "short")]).unwrap_err(),
            ConfigError::SecretKeyTooShort { .. }
        ));
        assert!(load(&[("DJANGO_SECRET_KEY", KEY)]).is_ok());
    }

    #[test]
    fn test_debug_uses_development_key() {
        let settings = load(&[("DEBUG", "true")]).unwrap();
        assert_eq!(settings.secret_key_bytes(), DEV_SECRET_KEY.as_bytes());
        assert_eq!(settings.log_level(), "debug");
    }

    #[test]
    fn test_security_policy_by_mode() {
        let production = load(&[("DJANGO_SECRET_KEY", KEY)]).unwrap();
        assert!(production.security.ssl_redirect);
        assert_eq!(
            production.security.hsts_header().as_deref(),
            Some("max-age=31536000; includeSubDomains; preload")
        );

        let development = load(&[("DEBUG", "true")]).unwrap();
        assert!(!development.security.ssl_redirect);
        assert_eq!(development.security.hsts_header(), None);
    }

    #[test]
    fn test_schedule_can_be_disabled() {
        let settings = load(&[("DEBUG", "true"), ("DISABLE_SCHEDULE", "TRUE")]).unwrap();
        assert!(!settings.is_installed(SiteApp::Schedule));
        assert!(settings.is_installed(SiteApp::Portal));
    }

    #[test]
    fn test_portal_owner_is_normalized() {
        let settings = load(&[
            ("DEBUG", "true"),
            ("PORTAL_OWNER_USERNAME", "  Owner "),
            ("PORTAL_OWNER_EMAIL", "Owner@Example.COM"),
        ])
        .unwrap();
        assert_eq!(settings.portal_owner.username, "owner");
        assert_eq!(settings.portal_owner.email, "owner@example.com");
    }

    #[test]
    fn test_summary_has_no_secrets() {
        let settings = load(&[
            ("DJANGO_SECRET_KEY", KEY),
            ("EMAIL_HOST_PASSWORD", "app-password"),
        ])
        .unwrap();
        let json = serde_json::to_string(&settings.summary()).unwrap();
        assert!(!json.contains(KEY));
        assert!(!json.contains("app-password"));
        assert!(json.contains("local_postgres"));
    }
}
