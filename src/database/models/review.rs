use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Customer recorded on reviews until an authenticated identity is available
pub const ANONYMOUS_CUSTOMER_ID: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub review: String,
    pub rating: i16,
    pub created_on: NaiveDateTime,
}

/// Review about to be inserted; id and `created_on` come from the database
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: i32,
    pub customer_id: i32,
    pub review: String,
    pub rating: i16,
}

/// What the caller gets back after posting a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReviewReceipt {
    pub name: String,
    pub review: String,
    pub rating: i16,
    pub created_on: NaiveDateTime,
}
