pub mod client;
pub mod models;

pub use client::RatingsClient;
pub use models::{Ratings, RatingsResponse, UNKNOWN_RATING};
