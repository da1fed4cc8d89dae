//! HTTPS redirect and security headers.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{is_secure, request_host};
use crate::api::AppState;
use crate::config::{CROSS_ORIGIN_OPENER_POLICY, REFERRER_POLICY};

/// Redirect plain HTTP when required, then harden every response.
pub async fn security_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = &state.settings.security;
    let secure = is_secure(request.uri(), request.headers(), policy);

    if policy.ssl_redirect && !secure {
        if let Some(host) = request_host(request.headers(), policy) {
            let path = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            let location = format!("https://{}{}", host, path);
            tracing::debug!(%location, "Redirecting to HTTPS");
            return (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location)],
            )
                .into_response();
        }
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static(REFERRER_POLICY),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static(CROSS_ORIGIN_OPENER_POLICY),
    );

    if secure {
        if let Some(value) = policy
            .hsts_header()
            .and_then(|v| HeaderValue::from_str(&v).ok())
        {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
        }
    }

    response
}
