pub mod models;
pub mod review;

// Re-exports
pub use models::*;

use axum::{routing::get, Json, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse { status: "hi" })
}

pub async fn health_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Reviews is healthy",
    })
}

/// Assemble the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(review::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}
