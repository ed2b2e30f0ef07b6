use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderId, RestaurantId, ReviewId, UserId};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A customer's rating of one delivered order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewSubmission {
    pub order_id: OrderId,
    pub rating: u8,
    pub comment: String,
}

impl ReviewSubmission {
    pub fn new(order_id: impl Into<OrderId>, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            rating,
            comment: comment.into(),
        }
    }
}

/// Whether a submission created the order's review or replaced its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "review", rename_all = "snake_case")]
pub enum ReviewOutcome {
    Created(Review),
    Updated(Review),
}

impl ReviewOutcome {
    pub fn review(&self) -> &Review {
        match self {
            ReviewOutcome::Created(review) | ReviewOutcome::Updated(review) => review,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub restaurant_id: RestaurantId,
    /// Mean rating rounded to one decimal place, 0.0 without reviews.
    pub average: f64,
    pub count: usize,
}
