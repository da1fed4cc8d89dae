//! Entry point of the administration area (namespace `admin`).

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::portal::{redirect_to_login, session_user};
use crate::api::extractors::CurrentLanguage;
use crate::api::pages::{escape, Page};
use crate::api::table::AppRoute;
use crate::api::AppState;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("index", "", get(index))]
}

/// Only the portal owner gets past this page.
pub async fn index(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    jar: SignedCookieJar,
    uri: Uri,
) -> Response {
    let owner = &state.settings.portal_owner.username;
    match session_user(&jar) {
        Some(user) if !owner.is_empty() && *owner == user => {
            Page::new(&language, "Site administration", uri.path())
                .body(format!("<p>Signed in as {}.</p>", escape(&user)))
                .render()
                .into_response()
        }
        _ => redirect_to_login(&state, uri.path()),
    }
}
