use serde::Deserialize;

/// Sentinel for a rating that could not be obtained.
pub const UNKNOWN_RATING: i64 = -1;

fn unknown_rating() -> i64 {
    UNKNOWN_RATING
}

/// Body returned by the ratings backend.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RatingsResponse {
    #[serde(default, alias = "Ratings", alias = "RATINGS", deserialize_with = "ratings_or_unknown")]
    pub ratings: Ratings,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Ratings {
    #[serde(
        rename = "Reviewer1",
        alias = "reviewer1",
        alias = "REVIEWER1",
        default = "unknown_rating"
    )]
    pub reviewer1: i64,
    #[serde(
        rename = "Reviewer2",
        alias = "reviewer2",
        alias = "REVIEWER2",
        default = "unknown_rating"
    )]
    pub reviewer2: i64,
}

impl Default for Ratings {
    fn default() -> Self {
        Self {
            reviewer1: UNKNOWN_RATING,
            reviewer2: UNKNOWN_RATING,
        }
    }
}

/// `"ratings": null` is treated like a missing object.
fn ratings_or_unknown<'de, D>(deserializer: D) -> Result<Ratings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Ratings>::deserialize(deserializer)?.unwrap_or_default())
}

impl RatingsResponse {
    /// Parse a backend body. Empty or malformed bodies yield unknown ratings.
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        match serde_json::from_slice(body) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed ratings payload");
                Self::default()
            }
        }
    }
}
