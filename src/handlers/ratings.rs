// src/handlers/ratings.rs
// DOCUMENTATION: Gentleness rating handlers (mounted under /razors)

use crate::errors::RazorError;
use crate::models::RateRazorRequest;
use crate::services::{authenticate, authenticate_optional, RatingService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// PUT /razors/{id}/rating
pub async fn rate_razor(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<RateRazorRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    body.validate()?;

    let submitted =
        RatingService::rate_razor(pool.get_ref(), user, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(submitted))
}

/// GET /razors/{id}/ratings
pub async fn list_ratings(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let viewer = authenticate_optional(&req, pool.get_ref()).await?.map(|u| u.id);
    let ratings = RatingService::list_ratings(pool.get_ref(), path.into_inner(), viewer).await?;
    Ok(HttpResponse::Ok().json(ratings))
}
