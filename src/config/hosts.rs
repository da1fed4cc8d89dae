//! Host and CSRF origin allow-lists.

use std::collections::BTreeSet;

use serde::Serialize;
use url::Url;

use super::constants::{CLOUD_IDE_FORWARDING_DOMAIN, DEFAULT_ALLOWED_HOSTS, DEFAULT_TRUSTED_ORIGINS};
use super::env::Env;

/// Hostnames the server accepts requests for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedHosts {
    patterns: BTreeSet<String>,
}

impl AllowedHosts {
    /// Baseline hosts plus `ALLOWED_HOSTS`, plus the cloud-IDE hosts in debug.
    pub fn from_env(env: &Env, debug: bool) -> Self {
        let mut patterns: BTreeSet<String> = DEFAULT_ALLOWED_HOSTS
            .iter()
            .map(|h| h.to_string())
            .chain(env.list("ALLOWED_HOSTS"))
            .map(|h| h.to_ascii_lowercase())
            .collect();

        if debug {
            patterns.insert(CLOUD_IDE_FORWARDING_DOMAIN.to_string());
            if let Some(ide_host) = env.non_empty("CODESPACE_HOST") {
                patterns.insert(ide_host.to_ascii_lowercase());
            }
        }

        Self { patterns }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(&pattern.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Whether a `Host` header value (port allowed) matches any pattern.
    pub fn is_allowed(&self, host_header: &str) -> bool {
        let Some(domain) = split_domain(host_header) else {
            return false;
        };
        self.patterns
            .iter()
            .any(|pattern| host_matches(&domain, pattern))
    }
}

/// Origins trusted for unsafe cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedOrigins {
    origins: BTreeSet<String>,
}

impl TrustedOrigins {
    pub fn from_env(env: &Env) -> Self {
        let origins = DEFAULT_TRUSTED_ORIGINS
            .iter()
            .map(|o| o.to_string())
            .chain(env.list("CSRF_TRUSTED_ORIGINS"))
            .collect();
        Self { origins }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }

    /// Whether an `Origin` value is trusted; `*.` matches any subdomain.
    pub fn is_trusted(&self, origin: &str) -> bool {
        let Ok(candidate) = Url::parse(origin) else {
            return false;
        };
        let Some(candidate_host) = candidate.host_str() else {
            return false;
        };

        self.origins.iter().any(|trusted| {
            let Some((scheme, rest)) = trusted.split_once("://") else {
                return false;
            };
            if !scheme.eq_ignore_ascii_case(candidate.scheme()) {
                return false;
            }
            match rest.strip_prefix("*.") {
                Some(suffix) => host_matches(candidate_host, &format!(".{}", suffix)),
                None => Url::parse(trusted)
                    .map(|t| t.origin() == candidate.origin())
                    .unwrap_or(false),
            }
        })
    }
}

/// Lowercased domain of a host header, without its port.
pub fn split_domain(host_header: &str) -> Option<String> {
    let host = host_header.trim().to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }

    // IPv6 literal: [::1]:8000
    if let Some(rest) = host.strip_prefix('[') {
        let end = rest.find(']')?;
        return Some(format!("[{}]", &rest[..end]));
    }

    let domain = match host.rsplit_once(':') {
        Some((domain, port)) if port.chars().all(|c| c.is_ascii_digit()) => domain,
        Some(_) => return None,
        None => host.as_str(),
    };
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// `*` matches all, `.example.com` matches it and its subdomains.
fn host_matches(domain: &str, pattern: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    if pattern == "*" {
        return true;
    }
    match pattern.strip_prefix('.') {
        Some(bare) => domain == bare || domain.ends_with(&pattern),
        None => domain == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(pairs: &[(&str, &str)], debug: bool) -> AllowedHosts {
        AllowedHosts::from_env(&Env::from_pairs(pairs.iter().copied()), debug)
    }

    #[test]
    fn test_baseline_always_present() {
        for raw in ["", ",,,", "  ,  ", "example.org, api.example.org", "::::"] {
            let allowed = hosts(&[("ALLOWED_HOSTS", raw)], false);
            for baseline in DEFAULT_ALLOWED_HOSTS {
                assert!(allowed.contains(baseline), "{} missing for {:?}", baseline, raw);
            }
        }
    }

    #[test]
    fn test_override_is_deduplicated() {
        let allowed = hosts(&[("ALLOWED_HOSTS", "localhost, example.org,example.org")], false);
        assert_eq!(allowed.iter().count(), DEFAULT_ALLOWED_HOSTS.len() + 1);
    }

    #[test]
    fn test_cloud_ide_host_requires_marker() {
        let without = hosts(&[("CODESPACE_HOST", "  ")], true);
        assert!(!without.contains("  "));
        assert_eq!(without.iter().count(), DEFAULT_ALLOWED_HOSTS.len() + 1);

        let with = hosts(&[("CODESPACE_HOST", "IDE.Example.dev")], true);
        assert!(with.contains("ide.example.dev"));

        let production = hosts(&[("CODESPACE_HOST", "ide.example.dev")], false);
        assert!(!production.contains("ide.example.dev"));
        assert!(!production.contains(CLOUD_IDE_FORWARDING_DOMAIN));
    }

    #[test]
    fn test_forwarding_domain_allowed_in_debug_without_marker() {
        let development = hosts(&[], true);
        assert!(development.contains(CLOUD_IDE_FORWARDING_DOMAIN));
        assert!(development.is_allowed("my-space-8000.app.github.dev"));

        let production = hosts(&[], false);
        assert!(!production.is_allowed("my-space-8000.app.github.dev"));
    }

    #[test]
    fn test_host_header_matching() {
        let allowed = hosts(&[("ALLOWED_HOSTS", ".example.org")], false);
        assert!(allowed.is_allowed("localhost:8000"));
        assert!(allowed.is_allowed("WWW.TheEnglishStudioCorvetto.com"));
        assert!(allowed.is_allowed("example.org"));
        assert!(allowed.is_allowed("shop.example.org"));
        assert!(!allowed.is_allowed("badexample.org"));
        assert!(!allowed.is_allowed("evil.com"));
        assert!(!allowed.is_allowed(""));
        assert!(!allowed.is_allowed("localhost:abc"));
    }

    #[test]
    fn test_ipv6_host_header() {
        let allowed = hosts(&[("ALLOWED_HOSTS", "[::1]")], false);
        assert!(allowed.is_allowed("[::1]:8000"));
    }

    #[test]
    fn test_trusted_origins() {
        let env = Env::from_pairs([("CSRF_TRUSTED_ORIGINS", "https://partner.example,")]);
        let origins = TrustedOrigins::from_env(&env);
        assert!(origins.is_trusted("https://theenglishstudiocorvetto.com"));
        assert!(origins.is_trusted("https://theenglishstudiocorvetto.onrender.com"));
        assert!(origins.is_trusted("https://partner.example"));
        assert!(!origins.is_trusted("http://theenglishstudiocorvetto.com"));
        assert!(!origins.is_trusted("https://evil.example"));
        assert!(!origins.is_trusted("null"));
    }
}
