// src/db/rating_repository.rs
// DOCUMENTATION: Gentleness ratings
// PURPOSE: Upsert a user's rating and keep razors.avg_gentleness in step

use crate::db::RazorRepository;
use crate::errors::RazorError;
use crate::models::{RateRazorRequest, RatingWithAuthor, UserRating};
use sqlx::PgPool;
use uuid::Uuid;

pub struct RatingRepository;

impl RatingRepository {
    /// Store the rating and recompute the razor average in one transaction
    /// Returns the stored rating and the new average
    pub async fn upsert_rating(
        pool: &PgPool,
        user_id: Uuid,
        razor_id: i64,
        req: &RateRazorRequest,
    ) -> Result<(UserRating, Option<i32>), RazorError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RazorError::db("Begin rating transaction failed", e))?;

        RazorRepository::lock_razor(&mut *tx, razor_id).await?;

        let rating = sqlx::query_as::<_, UserRating>(
            r#"
            INSERT INTO user_ratings (user_id, razor_id, gentleness_rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, razor_id) DO UPDATE
            SET
                gentleness_rating = EXCLUDED.gentleness_rating,
                comment = EXCLUDED.comment,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(razor_id)
        .bind(req.gentleness_rating)
        .bind(&req.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RazorError::db("Upsert rating failed", e))?;

        let avg = RazorRepository::refresh_avg_gentleness(&mut *tx, razor_id).await?;

        tx.commit()
            .await
            .map_err(|e| RazorError::db("Commit rating failed", e))?;

        log::info!(
            "Razor {} rated {} by {}; average now {:?}",
            razor_id,
            rating.gentleness_rating,
            user_id,
            avg
        );
        Ok((rating, avg))
    }

    /// All ratings of a razor with their authors, most recent first
    pub async fn get_ratings_by_razor(
        pool: &PgPool,
        razor_id: i64,
    ) -> Result<Vec<RatingWithAuthor>, RazorError> {
        sqlx::query_as::<_, RatingWithAuthor>(
            r#"
            SELECT ur.id, ur.user_id, ur.gentleness_rating, ur.comment,
                   p.username, p.full_name, ur.created_at, ur.updated_at
            FROM user_ratings ur
            JOIN profiles p ON p.id = ur.user_id
            WHERE ur.razor_id = $1
            ORDER BY ur.updated_at DESC, ur.id DESC
            "#,
        )
        .bind(razor_id)
        .fetch_all(pool)
        .await
        .map_err(|e| RazorError::db("Fetch ratings failed", e))
    }
}
