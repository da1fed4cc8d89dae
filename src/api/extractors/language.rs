//! Active language of the request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;

use crate::api::AppState;

/// Language from the URL prefix, else negotiated from cookie and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLanguage(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentLanguage {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(code) = state.routes.language_prefix(parts.uri.path()) {
            return Ok(CurrentLanguage(code.to_string()));
        }
        Ok(CurrentLanguage(negotiated_language(state, &parts.headers).to_string()))
    }
}

/// Language cookie, then `Accept-Language`, then the default.
pub(crate) fn negotiated_language<'a>(state: &'a AppState, headers: &HeaderMap) -> &'a str {
    let i18n = &state.settings.i18n;
    let jar = CookieJar::from_headers(headers);
    let cookie = jar.get(&i18n.cookie_name);
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    i18n.negotiate(cookie.as_ref().map(|c| c.value_trimmed()), accept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Env, Settings};
    use crate::infra::MemoryMailer;
    use axum::http::HeaderValue;
    use std::path::Path;
    use std::sync::Arc;

    fn state() -> AppState {
        let settings =
            Settings::from_source(&Env::from_pairs([("DEBUG", "true")]), Path::new(".")).unwrap();
        AppState::new(settings, Arc::new(MemoryMailer::default()), None)
    }

    fn with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        headers
    }

    #[test]
    fn test_cookie_beats_accept_language() {
        let state = state();
        assert_eq!(negotiated_language(&state, &with_cookie("theme=dark; site_language=it")), "it");
    }

    #[test]
    fn test_quoted_and_encoded_cookie_values() {
        let state = state();
        assert_eq!(negotiated_language(&state, &with_cookie("site_language=\"it\"")), "it");
        assert_eq!(negotiated_language(&state, &with_cookie("site_language=%69%74")), "it");
    }

    #[test]
    fn test_unsupported_cookie_falls_back() {
        let state = state();
        assert_eq!(negotiated_language(&state, &with_cookie("site_language=fr")), "en");
        assert_eq!(negotiated_language(&state, &HeaderMap::new()), "en");
    }
}
