//! Blog index.

use axum::{http::Uri, response::Html, routing::get};

use crate::api::extractors::CurrentLanguage;
use crate::api::pages::Page;
use crate::api::table::AppRoute;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("blog", "", get(index))]
}

pub async fn index(CurrentLanguage(language): CurrentLanguage, uri: Uri) -> Html<String> {
    Page::new(&language, "Blog", uri.path())
        .body(r#"<section class="posts"></section>"#)
        .render()
}
