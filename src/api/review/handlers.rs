use crate::api::models::*;
use crate::api::review::render;
use crate::ratings::{Ratings, RatingsClient, RatingsResponse};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info};

/// Parse the product id path segment. Anything that isn't an integer is 0.
// FIXME: invalid ids are silently rendered as product 0 instead of a 400.
pub fn parse_product_id(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

pub async fn reviews_handler(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Json<ReviewsResponse> {
    // Segments that don't even decode (e.g. invalid UTF-8) are coerced like any other bad id.
    let product_id = raw_id
        .map(|Path(raw_id)| parse_product_id(&raw_id))
        .unwrap_or(0);

    info!(product_id, ratings_enabled = state.ratings_client.is_some(), "Serving reviews");

    let ratings = match &state.ratings_client {
        Some(client) => Some(fetch_ratings(client.clone(), product_id, headers).await),
        None => None,
    };

    Json(render::reviews(
        product_id,
        ratings.as_ref().map(|r| (r, &*state.star_color)),
    ))
}

/// The backend call runs on its own task, so a client disconnect does not
/// cancel it; it finishes or times out on its own.
async fn fetch_ratings(client: Arc<RatingsClient>, product_id: i64, headers: HeaderMap) -> Ratings {
    let body = tokio::spawn(async move { client.fetch(product_id, &headers).await })
        .await
        .unwrap_or_else(|e| {
            error!(product_id, error = %e, "Ratings task failed");
            Bytes::new()
        });

    RatingsResponse::from_body(&body).ratings
}
