// src/db/razor_repository.rs
// DOCUMENTATION: Database access layer for the razor catalog
// PURPOSE: CRUD, filtered search and gentleness aggregation

use crate::db::collection_repository::LIVE_ENTRY;
use crate::errors::{is_unique_violation, RazorError};
use crate::models::{CreateRazorRequest, Razor, RazorSearchQuery, UpdateRazorRequest};
use crate::services::gentleness;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const RAZOR_COLUMNS: &str = r#"
    id, manufacturer, model, reference, blade_type, image_url,
    weight_grams, gap_mm, blade_exposure_mm, cutting_angle,
    price, release_year, material_variant, available_finish, comb_type,
    additional_info, is_private, avg_gentleness, created_by, created_at, updated_at
"#;

const LOCK_RAZOR_SQL: &str = "SELECT id FROM razors WHERE id = $1 FOR UPDATE";

/// RazorRepository: All database operations for razors
pub struct RazorRepository;

impl RazorRepository {
    /// Insert a razor and return the stored record
    /// DOCUMENTATION: Used by POST /razors; same manufacturer+model+reference is a 409
    pub async fn create_razor(
        pool: &PgPool,
        created_by: Uuid,
        req: &CreateRazorRequest,
    ) -> Result<Razor, RazorError> {
        let sql = format!(
            r#"
            INSERT INTO razors (
                manufacturer, model, reference, blade_type, image_url,
                weight_grams, gap_mm, blade_exposure_mm, cutting_angle,
                price, release_year, material_variant, available_finish, comb_type,
                additional_info, is_private, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            RAZOR_COLUMNS
        );

        let razor = sqlx::query_as::<_, Razor>(&sql)
            .bind(&req.manufacturer)
            .bind(&req.model)
            .bind(&req.reference)
            .bind(&req.blade_type)
            .bind(&req.image_url)
            .bind(req.weight_grams)
            .bind(req.gap_mm)
            .bind(req.blade_exposure_mm)
            .bind(req.cutting_angle)
            .bind(req.price)
            .bind(req.release_year)
            .bind(&req.material_variant)
            .bind(&req.available_finish)
            .bind(&req.comb_type)
            .bind(&req.additional_info)
            .bind(req.is_private)
            .bind(created_by)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RazorError::Conflict(format!(
                        "{} {} is already in the catalog",
                        req.manufacturer, req.model
                    ))
                } else {
                    RazorError::db("Create razor failed", e)
                }
            })?;

        log::info!("Created razor {} ({} {})", razor.id, razor.manufacturer, razor.model);
        Ok(razor)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Razor, RazorError> {
        let sql = format!("SELECT {} FROM razors WHERE id = $1", RAZOR_COLUMNS);
        sqlx::query_as::<_, Razor>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| RazorError::db("Fetch razor failed", e))?
            .ok_or_else(|| RazorError::NotFound(format!("Razor {}", id)))
    }

    /// Fetch several razors at once, in no particular order
    pub async fn get_many(pool: &PgPool, ids: &[i64]) -> Result<Vec<Razor>, RazorError> {
        let sql = format!("SELECT {} FROM razors WHERE id = ANY($1)", RAZOR_COLUMNS);
        sqlx::query_as::<_, Razor>(&sql)
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(|e| RazorError::db("Fetch razors failed", e))
    }

    /// Search razors with text and range filters
    /// DOCUMENTATION: Used for GET /razors
    /// Returns tuple: (results, total_count) for pagination
    pub async fn search(
        pool: &PgPool,
        query: &RazorSearchQuery,
        viewer: Option<Uuid>,
    ) -> Result<(Vec<Razor>, i64), RazorError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM razors");
        push_filters(&mut count_qb, query, viewer);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .map_err(|e| RazorError::db("Razor count query failed", e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM razors", RAZOR_COLUMNS));
        push_filters(&mut qb, query, viewer);
        qb.push(" ORDER BY ")
            .push(query.sort.order_by())
            .push(" LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let razors = qb
            .build_query_as::<Razor>()
            .fetch_all(pool)
            .await
            .map_err(|e| RazorError::db("Razor search query failed", e))?;

        log::debug!(
            "Razor search: {} results, {} total (page {})",
            razors.len(),
            total,
            query.page()
        );

        Ok((razors, total))
    }

    /// Distinct manufacturers of public razors, alphabetically
    pub async fn manufacturers(pool: &PgPool) -> Result<Vec<String>, RazorError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT manufacturer FROM razors WHERE is_private = FALSE ORDER BY manufacturer",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| RazorError::db("Fetch manufacturers failed", e))
    }

    /// Partial update - only provided fields are modified
    pub async fn update_razor(
        pool: &PgPool,
        id: i64,
        req: &UpdateRazorRequest,
    ) -> Result<Razor, RazorError> {
        let sql = format!(
            r#"
            UPDATE razors
            SET manufacturer = COALESCE($1, manufacturer),
                model = COALESCE($2, model),
                reference = COALESCE($3, reference),
                blade_type = COALESCE($4, blade_type),
                image_url = COALESCE($5, image_url),
                weight_grams = COALESCE($6, weight_grams),
                gap_mm = COALESCE($7, gap_mm),
                blade_exposure_mm = COALESCE($8, blade_exposure_mm),
                cutting_angle = COALESCE($9, cutting_angle),
                price = COALESCE($10, price),
                release_year = COALESCE($11, release_year),
                material_variant = COALESCE($12, material_variant),
                available_finish = COALESCE($13, available_finish),
                comb_type = COALESCE($14, comb_type),
                additional_info = COALESCE($15, additional_info),
                is_private = COALESCE($16, is_private),
                updated_at = NOW()
            WHERE id = $17
            RETURNING {}
            "#,
            RAZOR_COLUMNS
        );

        sqlx::query_as::<_, Razor>(&sql)
            .bind(&req.manufacturer)
            .bind(&req.model)
            .bind(&req.reference)
            .bind(&req.blade_type)
            .bind(&req.image_url)
            .bind(req.weight_grams)
            .bind(req.gap_mm)
            .bind(req.blade_exposure_mm)
            .bind(req.cutting_angle)
            .bind(req.price)
            .bind(req.release_year)
            .bind(&req.material_variant)
            .bind(&req.available_finish)
            .bind(&req.comb_type)
            .bind(&req.additional_info)
            .bind(req.is_private)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RazorError::Conflict("Another razor already uses this name".to_string())
                } else {
                    RazorError::db("Update razor failed", e)
                }
            })?
            .ok_or_else(|| RazorError::NotFound(format!("Razor {}", id)))
    }

    /// Hard delete; collections, ratings and reviews cascade
    pub async fn delete_razor(pool: &PgPool, id: i64) -> Result<(), RazorError> {
        let rows = sqlx::query("DELETE FROM razors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| RazorError::db("Delete razor failed", e))?
            .rows_affected();

        if rows == 0 {
            return Err(RazorError::NotFound(format!("Razor {}", id)));
        }

        log::info!("Deleted razor: {}", id);
        Ok(())
    }

    /// Whether a user other than `owner` has the razor in a collection
    pub async fn used_by_others(pool: &PgPool, id: i64, owner: Uuid) -> Result<bool, RazorError> {
        let sql = used_by_others_sql();
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_one(pool)
            .await
            .map_err(|e| RazorError::db("Collection usage check failed", e))
    }

    /// Row lock on the razor; rating writes for one razor queue behind it
    pub async fn lock_razor(conn: &mut PgConnection, razor_id: i64) -> Result<(), RazorError> {
        sqlx::query_scalar::<_, i64>(LOCK_RAZOR_SQL)
            .bind(razor_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| RazorError::db("Lock razor failed", e))?
            .map(|_| ())
            .ok_or_else(|| RazorError::NotFound(format!("Razor {}", razor_id)))
    }

    /// Recompute avg_gentleness from user_ratings inside the caller's transaction.
    /// Callers hold `lock_razor` so no concurrent rating is missed.
    pub async fn refresh_avg_gentleness(
        conn: &mut PgConnection,
        razor_id: i64,
    ) -> Result<Option<i32>, RazorError> {
        let ratings: Vec<i32> = sqlx::query_scalar(
            "SELECT gentleness_rating FROM user_ratings WHERE razor_id = $1",
        )
        .bind(razor_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| RazorError::db("Fetch ratings for average failed", e))?;

        let avg = gentleness::average(&ratings);

        sqlx::query("UPDATE razors SET avg_gentleness = $1, updated_at = NOW() WHERE id = $2")
            .bind(avg)
            .bind(razor_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| RazorError::db("Update avg_gentleness failed", e))?;

        Ok(avg)
    }
}

/// Only entries that still carry a flag (or are variants) count as usage
fn used_by_others_sql() -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM user_collections \
         WHERE razor_id = $1 AND user_id <> $2 AND {})",
        LIVE_ENTRY
    )
}

/// Escape LIKE wildcards so user text matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_range<T>(qb: &mut QueryBuilder<'_, Postgres>, column: &str, min: Option<T>, max: Option<T>)
where
    T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
{
    if let Some(min) = min {
        qb.push(format!(" AND {} >= ", column)).push_bind(min);
    }
    if let Some(max) = max {
        qb.push(format!(" AND {} <= ", column)).push_bind(max);
    }
}

/// WHERE clause shared by the count and page queries
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &RazorSearchQuery, viewer: Option<Uuid>) {
    qb.push(" WHERE (is_private = FALSE");
    if let Some(user) = viewer {
        qb.push(" OR created_by = ").push_bind(user);
    }
    qb.push(")");

    if let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (manufacturer ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR model ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR reference ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR additional_info ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(blade_type) = query.blade_type.as_deref().filter(|b| !b.is_empty() && *b != "all") {
        qb.push(" AND blade_type = ").push_bind(blade_type.to_string());
    }

    if let Some(manufacturer) = query.manufacturer.as_deref().filter(|m| !m.is_empty()) {
        qb.push(" AND manufacturer = ").push_bind(manufacturer.to_string());
    }

    if query.min_gentleness.is_some() || query.max_gentleness.is_some() {
        let min = query.min_gentleness.unwrap_or(gentleness::MIN_GENTLENESS);
        let max = query.max_gentleness.unwrap_or(gentleness::MAX_GENTLENESS);
        qb.push(" AND ((avg_gentleness >= ")
            .push_bind(min)
            .push(" AND avg_gentleness <= ")
            .push_bind(max)
            .push(")");
        if query.include_unrated {
            qb.push(" OR avg_gentleness IS NULL");
        }
        qb.push(")");
    }

    push_range(qb, "weight_grams", query.min_weight, query.max_weight);
    push_range(qb, "gap_mm", query.min_gap, query.max_gap);
    push_range(qb, "blade_exposure_mm", query.min_blade_exposure, query.max_blade_exposure);
    push_range(qb, "price", query.min_price, query.max_price);
    push_range(qb, "release_year", query.min_release_year, query.max_release_year);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RazorSort;

    #[test]
    fn test_rating_writes_lock_the_razor_row() {
        assert!(LOCK_RAZOR_SQL.starts_with("SELECT id FROM razors"));
        assert!(LOCK_RAZOR_SQL.ends_with("FOR UPDATE"));
    }

    #[test]
    fn test_usage_ignores_entries_without_flags() {
        let sql = used_by_others_sql();
        assert!(sql.contains("user_id <> $2"));
        assert!(sql.contains(LIVE_ENTRY));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Merkur"), "Merkur");
    }

    #[test]
    fn test_filters_only_public_for_anonymous() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM razors");
        push_filters(&mut qb, &RazorSearchQuery::default(), None);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM razors WHERE (is_private = FALSE)");
    }

    #[test]
    fn test_filters_bind_every_user_value() {
        let query = RazorSearchQuery {
            q: Some("34c'; DROP TABLE razors; --".into()),
            blade_type: Some("DE".into()),
            min_gentleness: Some(5),
            include_unrated: true,
            max_price: Some(80.0),
            sort: RazorSort::GentlenessAsc,
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM razors");
        push_filters(&mut qb, &query, Some(Uuid::new_v4()));
        let sql = qb.sql();

        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("OR created_by = $1"));
        assert!(sql.contains("manufacturer ILIKE $2"));
        assert!(sql.contains("blade_type = $6"));
        assert!(sql.contains("avg_gentleness >= $7 AND avg_gentleness <= $8) OR avg_gentleness IS NULL"));
        assert!(sql.ends_with("AND price <= $9"));
    }

    #[test]
    fn test_all_blade_type_means_no_filter() {
        let query = RazorSearchQuery {
            blade_type: Some("all".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM razors");
        push_filters(&mut qb, &query, None);
        assert!(!qb.sql().contains("blade_type"));
    }
}
