// src/services/rating_service.rs
// DOCUMENTATION: Gentleness ratings of razors

use crate::db::RatingRepository;
use crate::errors::RazorError;
use crate::models::{RateRazorRequest, RatingSubmitted, RatingWithAuthor};
use crate::services::auth::AuthUser;
use crate::services::gentleness;
use crate::services::RazorService;
use sqlx::PgPool;

pub struct RatingService;

impl RatingService {
    /// PUT /razors/{id}/rating
    pub async fn rate_razor(
        pool: &PgPool,
        user: AuthUser,
        razor_id: i64,
        req: RateRazorRequest,
    ) -> Result<RatingSubmitted, RazorError> {
        if !gentleness::is_valid(req.gentleness_rating) {
            return Err(RazorError::InvalidInput(format!(
                "gentleness_rating must be between {} and {}",
                gentleness::MIN_GENTLENESS,
                gentleness::MAX_GENTLENESS
            )));
        }
        RazorService::get_visible(pool, razor_id, Some(user.id)).await?;

        let (rating, avg_gentleness) =
            RatingRepository::upsert_rating(pool, user.id, razor_id, &req).await?;
        Ok(RatingSubmitted {
            rating,
            avg_gentleness,
        })
    }

    pub async fn list_ratings(
        pool: &PgPool,
        razor_id: i64,
        viewer: Option<uuid::Uuid>,
    ) -> Result<Vec<RatingWithAuthor>, RazorError> {
        RazorService::get_visible(pool, razor_id, viewer).await?;
        RatingRepository::get_ratings_by_razor(pool, razor_id).await
    }
}
