// src/models/rating.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user's gentleness rating of one razor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRating {
    pub id: i64,
    pub user_id: Uuid,
    pub razor_id: i64,
    pub gentleness_rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rating joined with its author's profile names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingWithAuthor {
    pub id: i64,
    pub user_id: Uuid,
    pub gentleness_rating: i32,
    pub comment: Option<String>,
    pub username: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for PUT /razors/{id}/rating
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateRazorRequest {
    #[validate(range(min = 1, max = 20))]
    pub gentleness_rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatingSubmitted {
    pub rating: UserRating,
    pub avg_gentleness: Option<i32>,
}
