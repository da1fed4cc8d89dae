//! Collected static files in production.
//!
//! Mounted beside the route table, never inside it: media is not served
//! here and `RouteTable::resolve` knows nothing about these paths.

use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::services::ServeDir;

use super::handlers::HANDLER_404;
use super::AppState;
use crate::config::{
    Settings, STATIC_DEFAULT_CACHE_CONTROL, STATIC_HASH_LENGTH, STATIC_IMMUTABLE_CACHE_CONTROL,
};

/// Static router for production, `None` in debug where the table serves assets.
pub fn production_static(settings: &Settings) -> Option<Router<AppState>> {
    if settings.debug {
        return None;
    }

    let assets = &settings.assets;
    let serve = ServeDir::new(&assets.static_root)
        .precompressed_br()
        .precompressed_gzip()
        .not_found_service(static_not_found.into_service());
    let mount_point = assets.static_url.trim_end_matches('/');
    tracing::debug!(prefix = %mount_point, root = %assets.static_root.display(), "Serving collected static files");

    Some(
        Router::new()
            .nest_service(mount_point, serve)
            .layer(middleware::from_fn(cache_headers)),
    )
}

async fn static_not_found() -> Response {
    HANDLER_404()
}

/// Far-future caching for hashed names, a short lifetime for the rest.
async fn cache_headers(request: Request, next: Next) -> Response {
    let hashed = is_hashed_name(request.uri().path());
    let mut response = next.run(request).await;

    let cacheable = response.status().is_success() || response.status() == StatusCode::NOT_MODIFIED;
    if cacheable {
        let policy = if hashed {
            STATIC_IMMUTABLE_CACHE_CONTROL
        } else {
            STATIC_DEFAULT_CACHE_CONTROL
        };
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(policy));
    }
    response
}

/// `name.<12 hex>.ext`, as written by the collect step.
fn is_hashed_name(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or_default();
    let parts: Vec<&str> = file.split('.').collect();
    if parts.len() < 3 {
        return false;
    }
    parts[1..parts.len() - 1].iter().any(|part| {
        part.len() == STATIC_HASH_LENGTH && part.chars().all(|c| c.is_ascii_hexdigit())
    })
}
