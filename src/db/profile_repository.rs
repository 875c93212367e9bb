// src/db/profile_repository.rs
// DOCUMENTATION: Profiles and session tokens
// PURPOSE: Account creation, credential lookup, token storage, activity stats

use crate::errors::{is_unique_violation, RazorError};
use crate::models::{Profile, ProfileStats};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const PRUNE_TOKENS_SQL: &str = "DELETE FROM user_tokens WHERE expires_at <= NOW()";

const PROFILE_COLUMNS: &str = "id, username, full_name, avatar_url, bio, is_admin, created_at";

pub struct ProfileRepository;

impl ProfileRepository {
    /// Create a profile; a taken username is a 409
    pub async fn create_profile(
        pool: &PgPool,
        username: &str,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> Result<Profile, RazorError> {
        let sql = format!(
            "INSERT INTO profiles (id, username, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(full_name)
            .bind(password_hash)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RazorError::Conflict(format!("Username '{}' is already taken", username))
                } else {
                    RazorError::db("Create profile failed", e)
                }
            })
    }

    /// (user id, password hash) for a username
    pub async fn get_credentials(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<(Uuid, String)>, RazorError> {
        sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, password_hash FROM profiles WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| RazorError::db("Credential lookup failed", e))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Profile, RazorError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| RazorError::db("Fetch profile failed", e))?
            .ok_or_else(|| RazorError::NotFound(format!("Profile {}", id)))
    }

    /// Replace the editable fields; a taken username is a 409
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        username: &str,
        bio: Option<&str>,
    ) -> Result<Profile, RazorError> {
        let sql = format!(
            "UPDATE profiles SET username = $2, bio = $3 WHERE id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(username)
            .bind(bio)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RazorError::Conflict(format!("Username '{}' is already taken", username))
                } else {
                    RazorError::db("Update profile failed", e)
                }
            })?
            .ok_or_else(|| RazorError::NotFound(format!("Profile {}", id)))
    }

    /// Activity counters for the rank computation
    pub async fn stats(pool: &PgPool, id: Uuid) -> Result<ProfileStats, RazorError> {
        sqlx::query_as::<_, ProfileStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM razors WHERE created_by = $1) AS razors_created,
                (SELECT COUNT(*) FROM review_comments WHERE user_id = $1) AS comments_posted,
                (SELECT COUNT(*) FROM razor_reviews WHERE user_id = $1) AS reviews_posted,
                (SELECT COUNT(*)
                   FROM review_likes l
                   JOIN razor_reviews r ON r.id = l.review_id
                  WHERE r.user_id = $1) AS likes_received,
                (SELECT COUNT(*) FROM user_collections
                  WHERE user_id = $1 AND in_collection) AS owned_razors,
                (SELECT COUNT(*) FROM user_collections
                  WHERE user_id = $1 AND in_wishlist) AS wishlisted_razors,
                (SELECT COUNT(*) FROM user_collections
                  WHERE user_id = $1 AND is_favorite) AS favorite_razors
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| RazorError::db("Fetch profile stats failed", e))
    }

    pub async fn insert_token(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RazorError> {
        sqlx::query("INSERT INTO user_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Store session token failed", e))?;
        Ok(())
    }

    /// (user id, is_admin) behind a live token
    pub async fn user_for_token(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<(Uuid, bool)>, RazorError> {
        sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT p.id, p.is_admin
            FROM user_tokens t
            JOIN profiles p ON p.id = t.user_id
            WHERE t.token_hash = $1 AND t.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
        .map_err(|e| RazorError::db("Session lookup failed", e))
    }

    pub async fn delete_token(pool: &PgPool, token_hash: &str) -> Result<u64, RazorError> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Revoke session token failed", e))?;
        Ok(result.rows_affected())
    }

    /// Delete every expired session token
    pub async fn prune_expired_tokens(pool: &PgPool) -> Result<u64, RazorError> {
        let result = sqlx::query(PRUNE_TOKENS_SQL)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Prune expired tokens failed", e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_matches_lookup_expiry() {
        // user_for_token accepts expires_at > NOW(), so everything else goes
        assert!(PRUNE_TOKENS_SQL.ends_with("expires_at <= NOW()"));
    }

    #[test]
    fn test_profile_columns_include_bio() {
        assert!(PROFILE_COLUMNS.split(", ").any(|c| c == "bio"));
    }
}
