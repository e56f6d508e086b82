use crate::ratings::RatingsClient;
use serde::Serialize;
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when ratings are disabled.
    pub ratings_client: Option<Arc<RatingsClient>>,
    pub star_color: Arc<str>,
}

/// Fixed status payload for `/` and `/health`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Response for `GET /reviews/{product_id}`
#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub id: String,
    pub reviews: Vec<Review>,
}

/// A single review
#[derive(Debug, Serialize)]
pub struct Review {
    pub reviewer: &'static str,
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Rating block: stars and color, or an error marker.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Rating {
    Stars { stars: i64, color: String },
    Unavailable { error: &'static str },
}
