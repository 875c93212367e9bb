// src/db/share_repository.rs
// DOCUMENTATION: Collection share snapshots

use crate::errors::{is_unique_violation, RazorError};
use crate::models::CollectionShare;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ShareRepository;

impl ShareRepository {
    /// Store a snapshot under `token`
    /// DOCUMENTATION: A token collision surfaces as Conflict so the caller can retry
    pub async fn insert_share(
        pool: &PgPool,
        user_id: Uuid,
        token: &str,
        data: &Value,
        expires_at: DateTime<Utc>,
    ) -> Result<CollectionShare, RazorError> {
        sqlx::query_as::<_, CollectionShare>(
            r#"
            INSERT INTO collection_shares (user_id, share_token, collection_data, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, share_token, collection_data, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(data)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RazorError::Conflict(format!("Share token {} already in use", token))
            } else {
                RazorError::db("Create share failed", e)
            }
        })
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<CollectionShare>, RazorError> {
        sqlx::query_as::<_, CollectionShare>(
            r#"
            SELECT id, user_id, share_token, collection_data, created_at, expires_at
            FROM collection_shares
            WHERE share_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
        .map_err(|e| RazorError::db("Fetch share failed", e))
    }
}
