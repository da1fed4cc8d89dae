//! Image gallery page.

use axum::{http::Uri, response::Html, routing::get};

use crate::api::extractors::CurrentLanguage;
use crate::api::pages::Page;
use crate::api::table::AppRoute;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("gallery", "", get(gallery))]
}

pub async fn gallery(CurrentLanguage(language): CurrentLanguage, uri: Uri) -> Html<String> {
    Page::new(&language, "Gallery", uri.path())
        .body(r#"<div class="gallery"></div>"#)
        .render()
}
