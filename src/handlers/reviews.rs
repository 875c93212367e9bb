// src/handlers/reviews.rs
// DOCUMENTATION: Review and like handlers
// PURPOSE: /razors/{id}/reviews, /razors/{id}/review and the /reviews scope

use crate::errors::RazorError;
use crate::handlers::comments;
use crate::models::UpsertReviewRequest;
use crate::services::{authenticate, authenticate_optional, ReviewService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// GET /razors/{id}/reviews
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let viewer = authenticate_optional(&req, pool.get_ref()).await?.map(|u| u.id);
    let reviews = ReviewService::list_for_razor(pool.get_ref(), path.into_inner(), viewer).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// PUT /razors/{id}/review
/// Creates the caller's review or replaces it
pub async fn upsert_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpsertReviewRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    body.validate()?;

    let review =
        ReviewService::upsert_review(pool.get_ref(), user, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    ReviewService::delete_review(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /reviews/{id}/like
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let like = ReviewService::toggle_like(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(like))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("/{id}", web::delete().to(delete_review))
            .route("/{id}/like", web::post().to(toggle_like))
            .route("/{id}/comments", web::get().to(comments::list_comments))
            .route("/{id}/comments", web::post().to(comments::create_comment)),
    );
}
