// src/services/review_service.rs
// DOCUMENTATION: Reviews and likes
// PURPOSE: Attach author ranks to reviews, enforce author/admin deletes

use crate::db::{ProfileRepository, ReviewRepository};
use crate::errors::RazorError;
use crate::models::{LikeResponse, Review, ReviewResponse, UpsertReviewRequest};
use crate::services::auth::AuthUser;
use crate::services::{user_rank, RazorService};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ReviewService;

impl ReviewService {
    /// GET /razors/{id}/reviews
    pub async fn list_for_razor(
        pool: &PgPool,
        razor_id: i64,
        viewer: Option<Uuid>,
    ) -> Result<Vec<ReviewResponse>, RazorError> {
        RazorService::get_visible(pool, razor_id, viewer).await?;
        let reviews = ReviewRepository::get_reviews_by_razor(pool, razor_id, viewer).await?;

        // One stats query per distinct author
        let mut ranks = HashMap::new();
        for review in &reviews {
            let author = review.review.user_id;
            if !ranks.contains_key(&author) {
                let stats = ProfileRepository::stats(pool, author).await?;
                ranks.insert(author, user_rank::rank_for(&stats));
            }
        }

        Ok(reviews
            .into_iter()
            .map(|review| {
                let (author_rank, author_stars) = ranks
                    .get(&review.review.user_id)
                    .map(|rank| (rank.title.clone(), rank.stars))
                    .unwrap_or_default();
                ReviewResponse {
                    review,
                    author_rank,
                    author_stars,
                }
            })
            .collect())
    }

    /// PUT /razors/{id}/review
    pub async fn upsert_review(
        pool: &PgPool,
        user: AuthUser,
        razor_id: i64,
        req: UpsertReviewRequest,
    ) -> Result<Review, RazorError> {
        RazorService::get_visible(pool, razor_id, Some(user.id)).await?;
        if req.review_content.trim().is_empty() {
            return Err(RazorError::InvalidInput("Review cannot be empty".to_string()));
        }
        let review = ReviewRepository::upsert_review(pool, user.id, razor_id, &req).await?;
        log::info!("User {} reviewed razor {}", user.id, razor_id);
        Ok(review)
    }

    /// DELETE /reviews/{id}
    pub async fn delete_review(pool: &PgPool, user: AuthUser, id: i64) -> Result<(), RazorError> {
        let review = ReviewRepository::get_by_id(pool, id).await?;
        if !user.can_manage(Some(review.user_id)) {
            return Err(RazorError::Forbidden);
        }
        ReviewRepository::delete_review(pool, id).await?;
        log::info!("Review {} deleted by {}", id, user.id);
        Ok(())
    }

    /// POST /reviews/{id}/like
    pub async fn toggle_like(pool: &PgPool, user: AuthUser, review_id: i64) -> Result<LikeResponse, RazorError> {
        ReviewRepository::get_by_id(pool, review_id).await?;
        let (liked, likes_count) = ReviewRepository::toggle_like(pool, user.id, review_id).await?;
        Ok(LikeResponse {
            review_id,
            liked,
            likes_count,
        })
    }
}
