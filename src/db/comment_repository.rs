// src/db/comment_repository.rs
// DOCUMENTATION: Review comment storage

use crate::errors::RazorError;
use crate::models::Comment;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentRepository;

impl CommentRepository {
    /// Flat list of a review's comments, oldest first
    pub async fn get_comments_by_review(
        pool: &PgPool,
        review_id: i64,
    ) -> Result<Vec<Comment>, RazorError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.review_id, c.user_id, c.parent_comment_id, c.content, c.created_at,
                   p.username, p.full_name, p.avatar_url
            FROM review_comments c
            JOIN profiles p ON p.id = c.user_id
            WHERE c.review_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(review_id)
        .fetch_all(pool)
        .await
        .map_err(|e| RazorError::db("Fetch comments failed", e))
    }

    /// (review_id, author) of a comment
    pub async fn get_owner(pool: &PgPool, id: i64) -> Result<Option<(i64, Uuid)>, RazorError> {
        sqlx::query_as::<_, (i64, Uuid)>(
            "SELECT review_id, user_id FROM review_comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| RazorError::db("Fetch comment failed", e))
    }

    pub async fn create_comment(
        pool: &PgPool,
        review_id: i64,
        user_id: Uuid,
        content: &str,
        parent_comment_id: Option<i64>,
    ) -> Result<Comment, RazorError> {
        sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO review_comments (review_id, user_id, parent_comment_id, content)
                VALUES ($1, $2, $3, $4)
                RETURNING id, review_id, user_id, parent_comment_id, content, created_at
            )
            SELECT i.id, i.review_id, i.user_id, i.parent_comment_id, i.content, i.created_at,
                   p.username, p.full_name, p.avatar_url
            FROM inserted i
            JOIN profiles p ON p.id = i.user_id
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .bind(parent_comment_id)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(|e| RazorError::db("Create comment failed", e))
    }

    /// Delete a comment; its replies cascade
    pub async fn delete_comment(pool: &PgPool, id: i64) -> Result<u64, RazorError> {
        let result = sqlx::query("DELETE FROM review_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Delete comment failed", e))?;
        Ok(result.rows_affected())
    }
}
