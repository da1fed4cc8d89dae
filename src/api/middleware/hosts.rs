//! Allowed-host validation.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::request_host;
use crate::api::AppState;
use crate::errors::AppError;

/// Reject requests whose host is not on the allow-list.
pub async fn allowed_host_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = request_host(request.headers(), &state.settings.security)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();

    if !state.settings.allowed_hosts.is_allowed(&host) {
        return Err(AppError::BadRequest(format!(
            "Invalid HTTP_HOST header: {:?}",
            host
        )));
    }

    Ok(next.run(request).await)
}
