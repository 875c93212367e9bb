// src/db/collection_repository.rs
// DOCUMENTATION: Database access for user_collections
// PURPOSE: List, toggle, variant and favorite-ranking queries
//
// Functions taking `&mut PgConnection` are meant to run inside the
// caller's transaction.

use crate::errors::RazorError;
use crate::models::{AddVariantRequest, CollectionFlags, CollectionRow, CollectionType};
use crate::services::ranking::RankedFavorite;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ENTRY_COLUMNS: &str = r#"
    uc.id, uc.razor_id, uc.in_collection, uc.in_wishlist, uc.is_favorite,
    uc.favorite_rating, uc.is_variant, uc.variant_material, uc.variant_finish,
    uc.variant_comb_type, uc.variant_notes,
    r.manufacturer AS r_manufacturer, r.model AS r_model, r.reference AS r_reference,
    r.image_url AS r_image_url, r.blade_type AS r_blade_type,
    r.avg_gentleness AS r_avg_gentleness
"#;

/// Rows that still mean something: a flag is set, or it is a variant.
/// Primary rows failing this are deleted as soon as they appear.
pub const LIVE_ENTRY: &str = "(in_collection OR in_wishlist OR is_favorite OR is_variant)";

/// Next favorite_rating for a user: one above their current top
const NEXT_FAVORITE_RATING: &str = "(SELECT COALESCE(MAX(f.favorite_rating), 0) + 1 \
     FROM user_collections f WHERE f.user_id = $1 AND f.is_favorite)";

const ENSURE_PRIMARY_SQL: &str = r#"
    INSERT INTO user_collections (user_id, razor_id)
    VALUES ($1, $2)
    ON CONFLICT (user_id, razor_id) WHERE NOT is_variant DO NOTHING
"#;

pub struct CollectionRepository;

impl CollectionRepository {
    /// Entries of one list, in display order
    /// DOCUMENTATION: `limit` of None returns the whole list
    pub async fn list_entries(
        pool: &PgPool,
        user_id: Uuid,
        list: CollectionType,
        limit: Option<i64>,
    ) -> Result<Vec<CollectionRow>, RazorError> {
        let (condition, order) = match list {
            CollectionType::Owned => ("uc.in_collection", "r.manufacturer ASC, r.model ASC, uc.id ASC"),
            CollectionType::Wishlist => ("uc.in_wishlist", "r.manufacturer ASC, r.model ASC, uc.id ASC"),
            CollectionType::Favorites => (
                "uc.is_favorite",
                "uc.favorite_rating DESC NULLS FIRST, uc.id ASC",
            ),
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM user_collections uc
            JOIN razors r ON r.id = uc.razor_id
            WHERE uc.user_id = $1 AND {}
            ORDER BY {}
            LIMIT $2
            "#,
            ENTRY_COLUMNS, condition, order
        );

        sqlx::query_as::<_, CollectionRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list {:?} for {}: {}", list, user_id, e);
                RazorError::DatabaseError(format!("Fetch collection failed: {}", e))
            })
    }

    /// Flags of the caller's primary (non-variant) entry for a razor, row locked
    pub async fn lock_primary_entry(
        conn: &mut PgConnection,
        user_id: Uuid,
        razor_id: i64,
    ) -> Result<Option<(i64, CollectionFlags)>, RazorError> {
        let row = sqlx::query_as::<_, (i64, bool, bool, bool)>(
            r#"
            SELECT id, in_collection, in_wishlist, is_favorite
            FROM user_collections
            WHERE user_id = $1 AND razor_id = $2 AND NOT is_variant
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(razor_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RazorError::db("Lock collection entry failed", e))?;

        Ok(row.map(|(id, in_collection, in_wishlist, is_favorite)| {
            (
                id,
                CollectionFlags {
                    in_collection,
                    in_wishlist,
                    is_favorite,
                },
            )
        }))
    }

    /// Make sure the primary entry exists so it can be locked.
    /// Concurrent callers wait on the unique index instead of failing.
    pub async fn ensure_primary_entry(
        conn: &mut PgConnection,
        user_id: Uuid,
        razor_id: i64,
    ) -> Result<(), RazorError> {
        sqlx::query(ENSURE_PRIMARY_SQL)
            .bind(user_id)
            .bind(razor_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RazorError::db("Insert collection entry failed", e))?;
        Ok(())
    }

    /// Write new flags; favorite_rating follows is_favorite
    pub async fn update_flags(
        conn: &mut PgConnection,
        user_id: Uuid,
        entry_id: i64,
        flags: CollectionFlags,
    ) -> Result<(), RazorError> {
        let sql = format!(
            r#"
            UPDATE user_collections
            SET in_collection = $2,
                in_wishlist = $3,
                is_favorite = $4,
                favorite_rating = CASE
                    WHEN NOT $4 THEN NULL
                    WHEN is_favorite THEN favorite_rating
                    ELSE {}
                END
            WHERE id = $5 AND user_id = $1
            "#,
            NEXT_FAVORITE_RATING
        );

        sqlx::query(&sql)
            .bind(user_id)
            .bind(flags.in_collection)
            .bind(flags.in_wishlist)
            .bind(flags.is_favorite)
            .bind(entry_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RazorError::db("Update collection flags failed", e))?;

        if flags.is_empty() {
            sqlx::query("DELETE FROM user_collections WHERE id = $1 AND NOT is_variant")
                .bind(entry_id)
                .execute(&mut *conn)
                .await
                .map_err(|e| RazorError::db("Remove empty collection entry failed", e))?;
        }

        Ok(())
    }

    /// The caller's favorites in display order, row locked
    pub async fn lock_favorites(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<RankedFavorite>, RazorError> {
        let rows = sqlx::query_as::<_, (i64, Option<i32>)>(
            r#"
            SELECT id, favorite_rating
            FROM user_collections
            WHERE user_id = $1 AND is_favorite
            ORDER BY favorite_rating DESC NULLS FIRST, id ASC
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| RazorError::db("Lock favorites failed", e))?;

        Ok(rows
            .into_iter()
            .map(|(entry_id, rating)| RankedFavorite { entry_id, rating })
            .collect())
    }

    pub async fn set_favorite_rating(
        conn: &mut PgConnection,
        entry_id: i64,
        rating: i32,
    ) -> Result<(), RazorError> {
        sqlx::query("UPDATE user_collections SET favorite_rating = $1 WHERE id = $2")
            .bind(rating)
            .bind(entry_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RazorError::db("Update favorite rating failed", e))?;
        Ok(())
    }

    /// Owned variant entry; several may exist per razor
    pub async fn insert_variant(
        pool: &PgPool,
        user_id: Uuid,
        razor_id: i64,
        req: &AddVariantRequest,
    ) -> Result<i64, RazorError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO user_collections (
                user_id, razor_id, in_collection, is_variant,
                variant_material, variant_finish, variant_comb_type, variant_notes
            )
            VALUES ($1, $2, TRUE, TRUE, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(razor_id)
        .bind(&req.material)
        .bind(&req.finish)
        .bind(&req.comb_type)
        .bind(&req.notes)
        .fetch_one(pool)
        .await
        .map_err(|e| RazorError::db("Insert variant failed", e))
    }

    pub async fn delete_entry(pool: &PgPool, user_id: Uuid, entry_id: i64) -> Result<u64, RazorError> {
        let result = sqlx::query("DELETE FROM user_collections WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Delete collection entry failed", e))?;
        Ok(result.rows_affected())
    }

    /// Drop the favorite flag and its rating; a primary row left with no
    /// flag is removed in the same transaction
    pub async fn clear_favorite(pool: &PgPool, user_id: Uuid, razor_id: i64) -> Result<u64, RazorError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RazorError::db("Begin clear favorite failed", e))?;

        let cleared = sqlx::query(
            r#"
            UPDATE user_collections
            SET is_favorite = FALSE, favorite_rating = NULL
            WHERE user_id = $1 AND razor_id = $2 AND is_favorite
            "#,
        )
        .bind(user_id)
        .bind(razor_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RazorError::db("Clear favorite failed", e))?
        .rows_affected();

        let sql = format!(
            "DELETE FROM user_collections WHERE user_id = $1 AND razor_id = $2 AND NOT {}",
            LIVE_ENTRY
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(razor_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RazorError::db("Remove empty collection entry failed", e))?;

        tx.commit()
            .await
            .map_err(|e| RazorError::db("Commit clear favorite failed", e))?;
        Ok(cleared)
    }
}
