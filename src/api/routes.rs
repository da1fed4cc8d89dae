//! Application route configuration.

use axum::{middleware, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::assets::production_static;
use super::handlers::main::panic_response;
use super::middleware::{allowed_host_middleware, csrf_origin_middleware, security_middleware};
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let mut router = state.routes.build_router();
    if let Some(assets) = production_static(&state.settings) {
        router = router.merge(assets);
    }

    router
        // Layers run bottom to top: hosts are checked before anything else
        .layer(middleware::from_fn_with_state(
            state.clone(),
            csrf_origin_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            allowed_host_middleware,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
