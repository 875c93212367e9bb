// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Written review of a razor, one per user per razor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: Uuid,
    pub razor_id: i64,
    pub review_content: String,
    pub efficiency_gentleness_ratio: i32,
    pub lather_evacuation: i32,
    pub handle_grip: i32,
    pub overall_rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review joined with author names and like/comment counters
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithMeta {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_has_liked: bool,
}

/// Review list item with the author's current rank title
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    #[serde(flatten)]
    pub review: ReviewWithMeta,
    pub author_rank: String,
    pub author_stars: f32,
}

/// Request body for PUT /razors/{id}/review
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertReviewRequest {
    #[validate(length(min = 1, max = 20000))]
    pub review_content: String,
    #[validate(range(min = 1, max = 5))]
    pub efficiency_gentleness_ratio: i32,
    #[validate(range(min = 1, max = 5))]
    pub lather_evacuation: i32,
    #[validate(range(min = 1, max = 5))]
    pub handle_grip: i32,
    #[validate(range(min = 1, max = 5))]
    pub overall_rating: i32,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub review_id: i64,
    pub liked: bool,
    pub likes_count: i64,
}
