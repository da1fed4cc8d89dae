//! Email transport settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use super::constants::{
    DEFAULT_EMAIL_HOST, DEFAULT_EMAIL_PORT, DEFAULT_EMAIL_TIMEOUT_SECONDS, FALLBACK_FROM_EMAIL,
};
use super::env::Env;
use crate::errors::ConfigError;

/// Where outgoing mail goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailBackend {
    /// Written to the log
    Console,
    /// Kept in process memory
    Memory,
    /// Relayed over SMTP
    Smtp,
}

impl FromStr for EmailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(EmailBackend::Console),
            "memory" | "locmem" => Ok(EmailBackend::Memory),
            "smtp" => Ok(EmailBackend::Smtp),
            other => Err(format!("unknown email backend {:?}", other)),
        }
    }
}

/// SMTP channel security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportSecurity {
    Plain,
    /// Upgrade with STARTTLS
    StartTls,
    /// TLS from the first byte (SMTPS)
    ImplicitTls,
}

/// Email delivery configuration.
#[derive(Clone)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    pub host: String,
    pub port: u16,
    pub username: String,
    password: String,
    pub security: TransportSecurity,
    pub timeout: Duration,
    pub default_from: String,
    pub server_email: String,
    pub contact_to: String,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security", &self.security)
            .field("timeout", &self.timeout)
            .field("default_from", &self.default_from)
            .field("server_email", &self.server_email)
            .field("contact_to", &self.contact_to)
            .finish()
    }
}

impl EmailConfig {
    /// Resolve the transport. Console is the default in debug, SMTP otherwise.
    pub fn from_env(env: &Env, debug: bool) -> Result<Self, ConfigError> {
        let default_backend = if debug {
            EmailBackend::Console
        } else {
            EmailBackend::Smtp
        };
        let backend = env.parse_or("EMAIL_BACKEND", default_backend)?;

        let use_tls = env.flag("EMAIL_USE_TLS", true);
        let use_ssl = env.flag("EMAIL_USE_SSL", false);
        let security = transport_security(use_tls, use_ssl)?;

        let username = env.string_or("EMAIL_HOST_USER", "").trim().to_string();
        // From stays the authenticated account; the placeholder only applies without one
        let default_from = env
            .non_empty("DEFAULT_FROM_EMAIL")
            .map(str::to_string)
            .unwrap_or_else(|| non_empty_or(&username, FALLBACK_FROM_EMAIL));
        let server_email = env
            .non_empty("SERVER_EMAIL")
            .map(str::to_string)
            .unwrap_or_else(|| default_from.clone());
        let contact_to = env
            .non_empty("CONTACT_TO_EMAIL")
            .map(str::to_string)
            .unwrap_or_else(|| non_empty_or(&username, &default_from));

        Ok(Self {
            backend,
            host: env.string_or("EMAIL_HOST", DEFAULT_EMAIL_HOST),
            port: env.parse_or("EMAIL_PORT", DEFAULT_EMAIL_PORT)?,
            username,
            password: env.string_or("EMAIL_HOST_PASSWORD", ""),
            security,
            timeout: Duration::from_secs(
                env.parse_or("EMAIL_TIMEOUT", DEFAULT_EMAIL_TIMEOUT_SECONDS)?,
            ),
            default_from,
            server_email,
            contact_to,
        })
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

/// STARTTLS and implicit TLS cannot both be requested.
pub fn transport_security(use_tls: bool, use_ssl: bool) -> Result<TransportSecurity, ConfigError> {
    match (use_tls, use_ssl) {
        (true, true) => Err(ConfigError::ConflictingEmailSecurity),
        (true, false) => Ok(TransportSecurity::StartTls),
        (false, true) => Ok(TransportSecurity::ImplicitTls),
        (false, false) => Ok(TransportSecurity::Plain),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(pairs: &[(&str, &str)], debug: bool) -> Result<EmailConfig, ConfigError> {
        EmailConfig::from_env(&Env::from_pairs(pairs.iter().copied()), debug)
    }

    #[test]
    fn test_tls_ssl_exclusive_for_all_combinations() {
        for tls in [false, true] {
            for ssl in [false, true] {
                let result = transport_security(tls, ssl);
                assert_eq!(result.is_err(), tls && ssl, "tls={} ssl={}", tls, ssl);
            }
        }
    }

    #[test]
    fn test_flags_from_env() {
        let err = email(&[("EMAIL_USE_SSL", "true")], false).unwrap_err();
        assert_eq!(err, ConfigError::ConflictingEmailSecurity);

        let ssl = email(&[("EMAIL_USE_SSL", "true"), ("EMAIL_USE_TLS", "false")], false).unwrap();
        assert_eq!(ssl.security, TransportSecurity::ImplicitTls);
    }

    #[test]
    fn test_backend_defaults_follow_debug() {
        assert_eq!(email(&[], true).unwrap().backend, EmailBackend::Console);
        assert_eq!(email(&[], false).unwrap().backend, EmailBackend::Smtp);
        assert_eq!(
            email(&[("EMAIL_BACKEND", "smtp")], true).unwrap().backend,
            EmailBackend::Smtp
        );
        assert!(email(&[("EMAIL_BACKEND", "pigeon")], true).is_err());
    }

    #[test]
    fn test_address_fallbacks() {
        let config = email(&[("EMAIL_HOST_USER", "school@example.com")], false).unwrap();
        assert_eq!(config.default_from, "school@example.com");
        assert_eq!(config.server_email, "school@example.com");
        assert_eq!(config.contact_to, "school@example.com");

        let bare = email(&[], true).unwrap();
        assert_eq!(bare.default_from, FALLBACK_FROM_EMAIL);
        assert_eq!(bare.contact_to, FALLBACK_FROM_EMAIL);
    }

    #[test]
    fn test_sender_is_the_authenticated_account() {
        let config = email(
            &[
                ("EMAIL_HOST_USER", " school@example.com "),
                ("CONTACT_TO_EMAIL", "office@example.com"),
                ("SERVER_EMAIL", "alerts@example.com"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(config.default_from, "school@example.com");
        assert_eq!(config.server_email, "alerts@example.com");
        assert_eq!(config.contact_to, "office@example.com");
    }

    #[test]
    fn test_defaults() {
        let config = email(&[], false).unwrap();
        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.security, TransportSecurity::StartTls);
        assert!(!config.has_credentials());
    }
}
