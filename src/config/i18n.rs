//! Internationalization settings and language negotiation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::constants::{DEFAULT_LANGUAGE, LANGUAGES, LANGUAGE_COOKIE_NAME, LOCALE_DIR_NAME, TIME_ZONE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub languages: Vec<Language>,
    pub cookie_name: String,
    pub locale_dir: PathBuf,
    pub time_zone: String,
}

impl I18nConfig {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            languages: LANGUAGES
                .iter()
                .map(|(code, name)| Language {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            cookie_name: LANGUAGE_COOKIE_NAME.to_string(),
            locale_dir: base_dir.join(LOCALE_DIR_NAME),
            time_zone: TIME_ZONE.to_string(),
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.code.as_str())
    }

    /// Supported code matching `tag` on its primary subtag (`it-IT` → `it`).
    pub fn supported(&self, tag: &str) -> Option<&str> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        self.codes().find(|code| *code == primary)
    }

    /// Cookie first, then `Accept-Language`, then the default.
    pub fn negotiate(&self, cookie: Option<&str>, accept_language: Option<&str>) -> &str {
        if let Some(code) = cookie.and_then(|c| self.supported(c)) {
            return code;
        }
        if let Some(code) = accept_language.and_then(|h| self.from_accept_language(h)) {
            return code;
        }
        &self.default_language
    }

    /// Highest-weighted supported language of an `Accept-Language` header.
    fn from_accept_language(&self, header: &str) -> Option<&str> {
        let mut candidates: Vec<(f32, usize, &str)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, entry)| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let weight = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                    .unwrap_or(1.0);
                (weight > 0.0).then_some((weight, position, tag))
            })
            .collect();
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        candidates
            .into_iter()
            .find_map(|(_, _, tag)| self.supported(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> I18nConfig {
        I18nConfig::new(Path::new("/srv/site"))
    }

    #[test]
    fn test_supported_matches_primary_subtag() {
        let i18n = config();
        assert_eq!(i18n.supported("it-IT"), Some("it"));
        assert_eq!(i18n.supported("EN_gb"), Some("en"));
        assert_eq!(i18n.supported("fr"), None);
    }

    #[test]
    fn test_negotiation_order() {
        let i18n = config();
        assert_eq!(i18n.negotiate(Some("it"), Some("en")), "it");
        assert_eq!(i18n.negotiate(Some("de"), Some("fr;q=1, it;q=0.5")), "it");
        assert_eq!(i18n.negotiate(None, Some("en;q=0.2, it;q=0.8")), "it");
        assert_eq!(i18n.negotiate(None, Some("it;q=0")), "en");
        assert_eq!(i18n.negotiate(None, None), "en");
    }
}
