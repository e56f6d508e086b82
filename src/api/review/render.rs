use crate::api::models::{Rating, Review, ReviewsResponse};
use crate::ratings::{Ratings, UNKNOWN_RATING};

pub const REVIEWER1: &str = "Reviewer1";
pub const REVIEWER1_TEXT: &str =
    "An extremely entertaining play by Shakespeare. The slapstick humour is refreshing!";

pub const REVIEWER2: &str = "Reviewer2";
pub const REVIEWER2_TEXT: &str = "Absolutely fun and entertaining. The play lacks thematic depth when compared to other plays by Shakespeare.";

pub const RATINGS_UNAVAILABLE: &str = "Ratings service is currently unavailable";

/// Combine the fixed reviews with per-request ratings.
///
/// `ratings` is `None` when ratings are disabled, in which case no review
/// carries a `rating` block.
pub fn reviews(product_id: i64, ratings: Option<(&Ratings, &str)>) -> ReviewsResponse {
    let rating = |stars: fn(&Ratings) -> i64| {
        ratings.map(|(ratings, color)| rating_block(stars(ratings), color))
    };

    ReviewsResponse {
        id: product_id.to_string(),
        reviews: vec![
            Review {
                reviewer: REVIEWER1,
                text: REVIEWER1_TEXT,
                rating: rating(|r| r.reviewer1),
            },
            Review {
                reviewer: REVIEWER2,
                text: REVIEWER2_TEXT,
                rating: rating(|r| r.reviewer2),
            },
        ],
    }
}

fn rating_block(stars: i64, color: &str) -> Rating {
    if stars == UNKNOWN_RATING {
        Rating::Unavailable {
            error: RATINGS_UNAVAILABLE,
        }
    } else {
        Rating::Stars {
            stars,
            color: color.to_string(),
        }
    }
}
