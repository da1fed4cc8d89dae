//! Language switching and prefix redirects.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use serde::Deserialize;
use url::Url;

use super::extractors::negotiated_language;
use super::handlers::HANDLER_404;
use super::middleware::request_host;
use super::table::{AppRoute, Resolution, RouteTable};
use super::AppState;
use crate::config::{split_domain, LANGUAGE_COOKIE_MAX_AGE_SECONDS};

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("set_language", "setlang/", post(set_language))]
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageForm {
    pub language: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Remember the chosen language and go back to the same page in it.
pub async fn set_language(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<SetLanguageForm>,
) -> Response {
    let next = safe_next(form.next.as_deref(), &headers, &state)
        .unwrap_or_else(|| "/".to_string());

    let Some(language) = state.settings.i18n.supported(&form.language) else {
        tracing::debug!(language = %form.language, "Ignoring unsupported language");
        return found(&next);
    };

    let target = translate_path(&state.routes, &next, language);
    let cookie = Cookie::build((state.settings.i18n.cookie_name.clone(), language.to_string()))
        .path("/")
        .max_age(Duration::seconds(LANGUAGE_COOKIE_MAX_AGE_SECONDS))
        .same_site(SameSite::Lax)
        .secure(state.settings.security.secure_cookies)
        .build();

    (jar.add(cookie), found(&target)).into_response()
}

/// Unmatched paths: add a missing slash, add a language prefix, or 404.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path();
    let query = request
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();
    let table = &state.routes;
    let is_read = matches!(*request.method(), Method::GET | Method::HEAD);

    if is_read && !path.ends_with('/') {
        let slashed = format!("{}/", path);
        if resolves_to_route(table, &slashed) {
            return redirect(StatusCode::MOVED_PERMANENTLY, &format!("{}{}", slashed, query));
        }
    }

    if table.language_prefix(path).is_none() {
        let language = negotiated_language(&state, request.headers());
        let prefixed = format!("/{}{}", language, path);
        if resolves_to_route(table, &prefixed) {
            return redirect(StatusCode::FOUND, &format!("{}{}", prefixed, query));
        }
        if is_read && !prefixed.ends_with('/') {
            let slashed = format!("{}/", prefixed);
            if resolves_to_route(table, &slashed) {
                return redirect(StatusCode::FOUND, &format!("{}{}", slashed, query));
            }
        }
    }

    HANDLER_404()
}

/// Swap the language prefix of a local path, keeping its query.
pub fn translate_path(table: &RouteTable, next: &str, language: &str) -> String {
    let (path, query) = match next.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (next, None),
    };

    let translated = match table.language_prefix(path) {
        Some(current) => format!("/{}{}", language, &path[current.len() + 1..]),
        None => path.to_string(),
    };

    match query {
        Some(query) => format!("{}?{}", translated, query),
        None => translated,
    }
}

/// `next` if local, else the referer's path when it points at this host.
fn safe_next(next: Option<&str>, headers: &HeaderMap, state: &AppState) -> Option<String> {
    if let Some(next) = next.filter(|n| is_local_path(n)) {
        return Some(next.to_string());
    }

    let referer = Url::parse(headers.get(header::REFERER)?.to_str().ok()?).ok()?;
    let host = split_domain(&request_host(headers, &state.settings.security)?)?;
    if referer.host_str()? != host {
        return None;
    }
    let mut local = referer.path().to_string();
    if let Some(query) = referer.query() {
        local.push('?');
        local.push_str(query);
    }
    Some(local)
}

fn is_local_path(candidate: &str) -> bool {
    candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\")
        && !candidate.chars().any(char::is_control)
}

fn resolves_to_route(table: &RouteTable, path: &str) -> bool {
    matches!(table.resolve(path), Some(Resolution::Route { .. }))
}

pub(crate) fn found(location: &str) -> Response {
    redirect(StatusCode::FOUND, location)
}

fn redirect(status: StatusCode, location: &str) -> Response {
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Env, Settings};
    use std::path::Path;

    fn table() -> RouteTable {
        let settings =
            Settings::from_source(&Env::from_pairs([("DEBUG", "true")]), Path::new(".")).unwrap();
        RouteTable::from_settings(&settings)
    }

    #[test]
    fn test_translate_path_swaps_prefix() {
        let table = table();
        assert_eq!(translate_path(&table, "/en/blog/", "it"), "/it/blog/");
        assert_eq!(translate_path(&table, "/en/", "it"), "/it/");
        assert_eq!(translate_path(&table, "/en/blog/?page=2", "it"), "/it/blog/?page=2");
        assert_eq!(translate_path(&table, "/english/", "it"), "/english/");
        assert_eq!(translate_path(&table, "/", "it"), "/");
    }

    #[tokio::test]
    async fn test_set_language_cookie_attributes() {
        use crate::infra::MemoryMailer;
        use std::sync::Arc;

        let settings =
            Settings::from_source(&Env::from_pairs([("DEBUG", "true")]), Path::new(".")).unwrap();
        let state = AppState::new(settings, Arc::new(MemoryMailer::default()), None);
        let form = SetLanguageForm {
            language: "it".to_string(),
            next: Some("/en/gallery/".to_string()),
        };

        let response =
            set_language(State(state), CookieJar::default(), HeaderMap::new(), Form(form)).await;

        assert_eq!(response.headers()[header::LOCATION], "/it/gallery/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("site_language=it"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_local_path_check() {
        assert!(is_local_path("/it/contact/"));
        assert!(!is_local_path("//evil.com/"));
        assert!(!is_local_path("/\\evil.com"));
        assert!(!is_local_path("https://evil.com/"));
        assert!(!is_local_path("/a\r\nSet-Cookie: x"));
    }
}
