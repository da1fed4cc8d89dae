//! Liveness and database connectivity.

use axum::{extract::State, http::StatusCode, response::Json, routing::get};
use serde::Serialize;

use crate::api::table::AppRoute;
use crate::api::AppState;
use crate::config::DatabaseMode;

pub fn routes() -> Vec<AppRoute> {
    vec![AppRoute::new("health", "health/", get(health))]
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    mode: DatabaseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mode = state.settings.database.mode();
    let database = match &state.database {
        None => ServiceStatus {
            status: "not_connected",
            mode,
            error: None,
        },
        Some(db) => match db.ping().await {
            Ok(_) => ServiceStatus {
                status: "healthy",
                mode,
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                mode,
                error: Some(e.to_string()),
            },
        },
    };

    let healthy = database.status != "unhealthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" },
            database,
        }),
    )
}
