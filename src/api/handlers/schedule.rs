//! Class schedule.

use axum::{http::Uri, response::Html, routing::get};

use crate::api::extractors::CurrentLanguage;
use crate::api::pages::Page;
use crate::api::table::AppRoute;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("schedule", "", get(calendar))]
}

pub async fn calendar(CurrentLanguage(language): CurrentLanguage, uri: Uri) -> Html<String> {
    Page::new(&language, "Class schedule", uri.path())
        .body(r#"<div id="calendar"></div>"#)
        .render()
}
