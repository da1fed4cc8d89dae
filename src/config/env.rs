//! Snapshot of the process environment.

use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Immutable view of environment variables taken once at startup.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Load `.env` (if any) and capture the process environment.
    pub fn from_process() -> Self {
        dotenvy::dotenv().ok();
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value, untouched.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Trimmed value, `None` when unset or blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Present with any non-empty value, whitespace included.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Value or default when unset. An empty value is kept as-is.
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Boolean flag: only a case-insensitive `true` is true.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(v) => v.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// Parse a typed value, failing fast on malformed input.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(key, raw, e.to_string())),
        }
    }

    /// Comma-separated list with blanks dropped. Never fails.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_case_insensitive_and_trimmed() {
        let env = Env::from_pairs([("A", " TRUE "), ("B", "yes"), ("C", "")]);
        assert!(env.flag("A", false));
        assert!(!env.flag("B", true));
        assert!(!env.flag("C", true));
        assert!(env.flag("MISSING", true));
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        let env = Env::from_pairs([("PORT", "58x")]);
        let err = env.parse_or::<u16>("PORT", 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
        assert_eq!(env.parse_or::<u16>("OTHER", 7).unwrap(), 7);
    }

    #[test]
    fn test_list_drops_blank_items() {
        let env = Env::from_pairs([("HOSTS", " a.com, ,b.com,,")]);
        assert_eq!(env.list("HOSTS"), vec!["a.com", "b.com"]);
        assert!(env.list("MISSING").is_empty());
    }

    #[test]
    fn test_non_empty_treats_whitespace_as_unset() {
        let env = Env::from_pairs([("RENDER", "  ")]);
        assert_eq!(env.non_empty("RENDER"), None);
        assert!(env.is_set("RENDER"));
        assert!(!env.is_set("DATABASE_URL"));
    }
}
