//! Home, static pages and the site-wide error views.

use std::any::Any;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, Response},
    routing::get,
};

use crate::api::extractors::CurrentLanguage;
use crate::api::pages::{self, Page};
use crate::api::table::AppRoute;
use crate::api::AppState;

pub fn routes() -> Vec<AppRoute> {
    vec![
        AppRoute::new("home", "", get(home)),
        AppRoute::new("privacy", "privacy/", get(privacy)),
    ]
}

/// Landing page linking every mounted section.
pub async fn home(
    State(state): State<AppState>,
    CurrentLanguage(language): CurrentLanguage,
    uri: Uri,
) -> Html<String> {
    let links: String = [
        ("schedule", "Class schedule"),
        ("blog", "Blog"),
        ("flyers", "Flyers"),
        ("gallery", "Gallery"),
        ("contact", "Contact us"),
        ("portal:dashboard", "Student portal"),
    ]
    .iter()
    .filter_map(|(name, label)| {
        state
            .routes
            .reverse(name, &language)
            .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, label))
    })
    .collect();

    Page::new(&language, "The English Studio", uri.path())
        .body(format!("<ul>{}</ul>", links))
        .render()
}

pub async fn privacy(CurrentLanguage(language): CurrentLanguage, uri: Uri) -> Html<String> {
    Page::new(&language, "Privacy policy", uri.path())
        .body("<p>We only use your details to answer your enquiries.</p>")
        .render()
}

/// Rendered whenever nothing matches.
pub fn not_found() -> Response {
    pages::error_page(
        StatusCode::NOT_FOUND,
        "Page not found",
        "Sorry, the page you were looking for does not exist.",
    )
}

/// Rendered for unhandled failures.
pub fn server_error() -> Response {
    pages::error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server error",
        "Something went wrong on our side. Please try again later.",
    )
}

/// Panic hook for the catch-panic layer.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "Handler panicked");
    super::HANDLER_500()
}
