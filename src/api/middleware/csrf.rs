//! Origin checks for state-changing requests.
//!
//! Token handling belongs to the forms themselves; this layer only makes
//! sure unsafe methods come from this site or a trusted origin.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use url::Url;

use super::{is_secure, request_host};
use crate::api::AppState;
use crate::config::Settings;
use crate::errors::AppError;

/// Reject cross-site unsafe requests from untrusted origins.
pub async fn csrf_origin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_safe_method(request.method()) {
        return Ok(next.run(request).await);
    }

    let secure = is_secure(request.uri(), request.headers(), &state.settings.security);
    check_origin(&state.settings, request.headers(), secure).map_err(AppError::Forbidden)?;

    Ok(next.run(request).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// `Err` carries the rejection reason for the log.
pub(crate) fn check_origin(
    settings: &Settings,
    headers: &HeaderMap,
    secure: bool,
) -> Result<(), String> {
    let host = request_host(headers, &settings.security).unwrap_or_default();
    let scheme = if secure { "https" } else { "http" };
    let own_origin = format!("{}://{}", scheme, host.to_ascii_lowercase());

    if let Some(origin) = headers.get(header::ORIGIN).and_then(|o| o.to_str().ok()) {
        let origin = origin.trim().to_ascii_lowercase();
        if origin == own_origin || settings.csrf_trusted_origins.is_trusted(&origin) {
            return Ok(());
        }
        return Err(format!("Origin checking failed - {} does not match any trusted origins", origin));
    }

    if let Some(referer) = headers.get(header::REFERER).and_then(|r| r.to_str().ok()) {
        let referer = Url::parse(referer).map_err(|_| "Referer checking failed - malformed".to_string())?;
        let referer_origin = referer.origin().ascii_serialization();
        if referer_origin == own_origin || settings.csrf_trusted_origins.is_trusted(&referer_origin) {
            return Ok(());
        }
        return Err(format!("Referer checking failed - {} does not match any trusted origins", referer_origin));
    }

    if settings.debug {
        return Ok(());
    }
    Err("Origin checking failed - no Origin or Referer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Env;
    use axum::http::HeaderValue;
    use std::path::Path;

    fn settings(debug: bool) -> Settings {
        let env = if debug {
            Env::from_pairs([("DEBUG", "true")])
        } else {
            Env::from_pairs([("DJANGO_SECRET_KEY", "a-production-secret-key-that-is-long-enough")])
        };
        Settings::from_source(&env, Path::new(".")).unwrap()
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_same_origin_passes() {
        let settings = settings(false);
        let h = headers(&[("host", "theenglishstudiocorvetto.com"), ("origin", "https://theenglishstudiocorvetto.com")]);
        assert!(check_origin(&settings, &h, true).is_ok());
    }

    #[test]
    fn test_trusted_wildcard_origin_passes() {
        let settings = settings(false);
        let h = headers(&[("host", "localhost"), ("origin", "https://preview-42.onrender.com")]);
        assert!(check_origin(&settings, &h, true).is_ok());
    }

    #[test]
    fn test_foreign_origin_rejected() {
        let settings = settings(false);
        let h = headers(&[("host", "localhost"), ("origin", "https://evil.example")]);
        assert!(check_origin(&settings, &h, true).is_err());

        let h = headers(&[("host", "localhost"), ("referer", "https://evil.example/form")]);
        assert!(check_origin(&settings, &h, true).is_err());
    }

    #[test]
    fn test_missing_headers_only_allowed_in_debug() {
        let h = headers(&[("host", "localhost")]);
        assert!(check_origin(&settings(false), &h, true).is_err());
        assert!(check_origin(&settings(true), &h, false).is_ok());
    }
}
