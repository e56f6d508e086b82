use crate::api::models::AppState;
use crate::api::review::handlers::reviews_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews/{product_id}", get(reviews_handler))
}
