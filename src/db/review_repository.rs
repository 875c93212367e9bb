// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Upsert, list and delete razor reviews, plus review likes

use crate::errors::RazorError;
use crate::models::{Review, ReviewWithMeta, UpsertReviewRequest};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Create or replace the caller's review of a razor
    /// DOCUMENTATION: One review per (user, razor); a second submit edits the first
    pub async fn upsert_review(
        pool: &PgPool,
        user_id: Uuid,
        razor_id: i64,
        req: &UpsertReviewRequest,
    ) -> Result<Review, RazorError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO razor_reviews (
                user_id, razor_id, review_content, efficiency_gentleness_ratio,
                lather_evacuation, handle_grip, overall_rating
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, razor_id) DO UPDATE
            SET
                review_content = EXCLUDED.review_content,
                efficiency_gentleness_ratio = EXCLUDED.efficiency_gentleness_ratio,
                lather_evacuation = EXCLUDED.lather_evacuation,
                handle_grip = EXCLUDED.handle_grip,
                overall_rating = EXCLUDED.overall_rating,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(razor_id)
        .bind(&req.review_content)
        .bind(req.efficiency_gentleness_ratio)
        .bind(req.lather_evacuation)
        .bind(req.handle_grip)
        .bind(req.overall_rating)
        .fetch_one(pool)
        .await
        .map_err(|e| RazorError::db("Upsert review failed", e))?;

        Ok(review)
    }

    /// Get reviews for a razor, newest first
    /// DOCUMENTATION: `viewer` drives user_has_liked; anonymous callers see false everywhere
    pub async fn get_reviews_by_razor(
        pool: &PgPool,
        razor_id: i64,
        viewer: Option<Uuid>,
    ) -> Result<Vec<ReviewWithMeta>, RazorError> {
        sqlx::query_as::<_, ReviewWithMeta>(
            r#"
            SELECT
                r.*,
                p.username, p.full_name, p.avatar_url,
                (SELECT COUNT(*) FROM review_likes l WHERE l.review_id = r.id) AS likes_count,
                (SELECT COUNT(*) FROM review_comments c WHERE c.review_id = r.id) AS comments_count,
                EXISTS (
                    SELECT 1 FROM review_likes l WHERE l.review_id = r.id AND l.user_id = $2
                ) AS user_has_liked
            FROM razor_reviews r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.razor_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(razor_id)
        .bind(viewer)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for razor {}: {}", razor_id, e);
            RazorError::DatabaseError(format!("Fetch reviews failed: {}", e))
        })
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Review, RazorError> {
        sqlx::query_as::<_, Review>("SELECT * FROM razor_reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| RazorError::db("Fetch review failed", e))?
            .ok_or_else(|| RazorError::NotFound(format!("Review {}", id)))
    }

    pub async fn count_by_razor(pool: &PgPool, razor_id: i64) -> Result<i64, RazorError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM razor_reviews WHERE razor_id = $1")
            .bind(razor_id)
            .fetch_one(pool)
            .await
            .map_err(|e| RazorError::db("Count reviews failed", e))
    }

    /// Delete a review; likes and comments cascade
    pub async fn delete_review(pool: &PgPool, id: i64) -> Result<u64, RazorError> {
        let result = sqlx::query("DELETE FROM razor_reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete review {}: {}", id, e);
                RazorError::DatabaseError(format!("Delete review failed: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    /// Flip the caller's like on a review
    /// Returns (liked_now, likes_count)
    pub async fn toggle_like(
        pool: &PgPool,
        user_id: Uuid,
        review_id: i64,
    ) -> Result<(bool, i64), RazorError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RazorError::db("Begin like transaction failed", e))?;

        let removed = sqlx::query("DELETE FROM review_likes WHERE user_id = $1 AND review_id = $2")
            .bind(user_id)
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RazorError::db("Remove like failed", e))?
            .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query(
                "INSERT INTO review_likes (user_id, review_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RazorError::db("Add like failed", e))?;
        }

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM review_likes WHERE review_id = $1",
        )
        .bind(review_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RazorError::db("Count likes failed", e))?;

        tx.commit()
            .await
            .map_err(|e| RazorError::db("Commit like failed", e))?;

        Ok((liked, count))
    }
}
