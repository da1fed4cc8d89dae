//! Login-gated student portal (namespace `portal`).
//!
//! Credentials are checked by the delegated auth backend; this module only
//! reads the signed session it leaves behind.

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use crate::api::extractors::CurrentLanguage;
use crate::api::locale::found;
use crate::api::messages::{self, FlashMessage, Level, Notice};
use crate::api::pages::{escape, Page};
use crate::api::table::AppRoute;
use crate::api::AppState;
use crate::config::PORTAL_SESSION_COOKIE;

pub fn routes() -> Vec<AppRoute> {
    vec![
        AppRoute::new("dashboard", "", get(dashboard)),
        AppRoute::new("login", "login/", get(login)),
        AppRoute::new("logout", "logout/", post(logout)),
    ]
}

/// Username stored in the signed portal session, if any.
pub fn session_user(jar: &SignedCookieJar) -> Option<String> {
    jar.get(PORTAL_SESSION_COOKIE)
        .map(|cookie| cookie.value().trim().to_lowercase())
        .filter(|user| !user.is_empty())
}

/// Send an anonymous visitor to the login page, coming back afterwards.
pub fn redirect_to_login(state: &AppState, next: &str) -> Response {
    let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    found(&format!("{}?next={}", state.settings.auth.login_url, next))
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
    uri: Uri,
) -> Response {
    let Some(user) = session_user(&jar) else {
        return redirect_to_login(&state, uri.path());
    };

    let owner = &state.settings.portal_owner;
    let is_owner = !owner.username.is_empty() && owner.username == user;
    let role = if is_owner { "Owner" } else { "Student" };
    tracing::debug!(%user, is_owner, "Portal dashboard");

    Page::new(&language, "Portal", uri.path())
        .body(format!(
            r#"<p>Welcome, {}.</p><p class="role">{}</p>"#,
            escape(&user),
            role
        ))
        .render()
        .into_response()
}

pub async fn login(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
    uri: Uri,
) -> Response {
    if session_user(&jar).is_some() {
        if let Some(target) = state.routes.reverse(&state.settings.auth.login_redirect, &language) {
            return found(&target);
        }
    }

    let (jar, flash) = messages::take(jar);
    let page = Page::new(&language, "Sign in", uri.path())
        .flash(flash)
        .body(r#"<p>Sign in with your school account to reach your portal.</p>"#)
        .render();
    (jar, page).into_response()
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
) -> Response {
    let jar = jar.remove(Cookie::build(PORTAL_SESSION_COOKIE).path("/"));
    let jar = messages::push(
        jar,
        FlashMessage::new(Level::Info, Notice::LoggedOut),
        state.settings.security.secure_cookies,
    );
    let target = state
        .routes
        .reverse(&state.settings.auth.logout_redirect, &language)
        .unwrap_or_else(|| "/".to_string());
    (jar, found(&target)).into_response()
}
