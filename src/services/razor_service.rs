// src/services/razor_service.rs
// DOCUMENTATION: Business logic for the razor catalog
// PURPOSE: Intermediary between handlers and repositories, owns permission rules

use crate::db::{RatingRepository, RazorRepository, ReviewRepository};
use crate::errors::RazorError;
use crate::models::{
    CreateRazorRequest, Razor, RazorDetailResponse, RazorListResponse, RazorSearchQuery,
    UpdateRazorRequest,
};
use crate::services::auth::AuthUser;
use crate::services::gentleness;
use sqlx::PgPool;
use uuid::Uuid;

/// Who may delete a razor
/// DOCUMENTATION: Admins always; the creator only while no one else collects it
pub fn check_delete_allowed(
    user: AuthUser,
    created_by: Option<Uuid>,
    used_by_others: bool,
) -> Result<(), RazorError> {
    if user.is_admin {
        return Ok(());
    }
    if created_by != Some(user.id) {
        return Err(RazorError::Forbidden);
    }
    if used_by_others {
        return Err(RazorError::Conflict(
            "This razor is in other members' collections and can only be deleted by an admin"
                .to_string(),
        ));
    }
    Ok(())
}

pub struct RazorService;

impl RazorService {
    /// Search the catalog
    pub async fn search_razors(
        pool: &PgPool,
        query: RazorSearchQuery,
        viewer: Option<Uuid>,
    ) -> Result<RazorListResponse, RazorError> {
        let (razors, total_count) = RazorRepository::search(pool, &query, viewer).await?;

        // Calculate pagination metadata
        let page = query.page();
        let limit = query.limit();
        let has_more = total_count > page * limit;

        Ok(RazorListResponse {
            data: razors,
            total_count,
            page,
            limit,
            has_more,
        })
    }

    pub async fn manufacturers(pool: &PgPool) -> Result<Vec<String>, RazorError> {
        RazorRepository::manufacturers(pool).await
    }

    /// A razor the viewer is allowed to see, else 404
    pub async fn get_visible(pool: &PgPool, id: i64, viewer: Option<Uuid>) -> Result<Razor, RazorError> {
        let razor = RazorRepository::get_by_id(pool, id).await?;
        if !razor.is_visible_to(viewer) {
            return Err(RazorError::NotFound(format!("Razor {}", id)));
        }
        Ok(razor)
    }

    /// GET /razors/{id}
    pub async fn get_razor_detail(
        pool: &PgPool,
        id: i64,
        viewer: Option<Uuid>,
    ) -> Result<RazorDetailResponse, RazorError> {
        let razor = Self::get_visible(pool, id, viewer).await?;
        let ratings = RatingRepository::get_ratings_by_razor(pool, id).await?;
        let review_count = ReviewRepository::count_by_razor(pool, id).await?;

        let variants = razor.variant_options();
        Ok(RazorDetailResponse {
            gentleness_label: gentleness::label(razor.avg_gentleness),
            gentleness_color: gentleness::color(razor.avg_gentleness),
            has_variants: variants.has_variants(),
            variants,
            ratings,
            review_count,
            razor,
        })
    }

    pub async fn create_razor(
        pool: &PgPool,
        user: AuthUser,
        req: CreateRazorRequest,
    ) -> Result<Razor, RazorError> {
        let req = req.normalized();
        if req.manufacturer.is_empty() || req.model.is_empty() || req.blade_type.is_empty() {
            return Err(RazorError::InvalidInput(
                "manufacturer, model and blade_type are required".to_string(),
            ));
        }
        RazorRepository::create_razor(pool, user.id, &req).await
    }

    /// Creator or admin only
    pub async fn update_razor(
        pool: &PgPool,
        user: AuthUser,
        id: i64,
        req: UpdateRazorRequest,
    ) -> Result<Razor, RazorError> {
        let razor = RazorRepository::get_by_id(pool, id).await?;
        if !user.can_manage(razor.created_by) {
            log::warn!("User {} tried to edit razor {} they do not own", user.id, id);
            return Err(RazorError::Forbidden);
        }
        RazorRepository::update_razor(pool, id, &req).await
    }

    pub async fn delete_razor(pool: &PgPool, user: AuthUser, id: i64) -> Result<(), RazorError> {
        let razor = RazorRepository::get_by_id(pool, id).await?;

        let used_by_others = if user.is_admin {
            false
        } else {
            RazorRepository::used_by_others(pool, id, user.id).await?
        };
        check_delete_allowed(user, razor.created_by, used_by_others)?;

        RazorRepository::delete_razor(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            is_admin: false,
        }
    }

    #[test]
    fn test_admin_may_always_delete() {
        let admin = AuthUser {
            id: Uuid::new_v4(),
            is_admin: true,
        };
        assert!(check_delete_allowed(admin, Some(Uuid::new_v4()), true).is_ok());
        assert!(check_delete_allowed(admin, None, false).is_ok());
    }

    #[test]
    fn test_creator_blocked_when_others_collect_it() {
        let user = member();
        assert!(check_delete_allowed(user, Some(user.id), false).is_ok());
        assert!(matches!(
            check_delete_allowed(user, Some(user.id), true),
            Err(RazorError::Conflict(_))
        ));
    }

    #[test]
    fn test_stranger_is_forbidden() {
        let user = member();
        assert!(matches!(
            check_delete_allowed(user, Some(Uuid::new_v4()), false),
            Err(RazorError::Forbidden)
        ));
        assert!(matches!(
            check_delete_allowed(user, None, false),
            Err(RazorError::Forbidden)
        ));
    }
}
