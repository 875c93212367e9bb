// src/handlers/razors.rs
// DOCUMENTATION: HTTP handlers for the razor catalog
// PURPOSE: Parse requests, call services, return responses

use crate::errors::RazorError;
use crate::handlers::{ratings, reviews};
use crate::models::{CreateRazorRequest, RazorSearchQuery, UpdateRazorRequest};
use crate::services::{authenticate, authenticate_optional, RazorService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// GET /razors
/// Filtered, paginated catalog; signed-in callers also see their private razors
pub async fn list_razors(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<RazorSearchQuery>,
) -> Result<impl Responder, RazorError> {
    let viewer = authenticate_optional(&req, pool.get_ref()).await?.map(|u| u.id);
    let result = RazorService::search_razors(pool.get_ref(), query.into_inner(), viewer).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /razors/manufacturers
pub async fn list_manufacturers(pool: web::Data<PgPool>) -> Result<impl Responder, RazorError> {
    let manufacturers = RazorService::manufacturers(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(manufacturers))
}

/// GET /razors/{id}
pub async fn get_razor(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let viewer = authenticate_optional(&req, pool.get_ref()).await?.map(|u| u.id);
    let detail = RazorService::get_razor_detail(pool.get_ref(), path.into_inner(), viewer).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /razors
pub async fn create_razor(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<CreateRazorRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;

    // Validate request
    if let Err(e) = body.validate() {
        return Err(RazorError::ValidationError(e.to_string()));
    }

    let razor = RazorService::create_razor(pool.get_ref(), user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(razor))
}

/// PUT /razors/{id}
pub async fn update_razor(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateRazorRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    body.validate()?;

    let razor =
        RazorService::update_razor(pool.get_ref(), user, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(razor))
}

/// DELETE /razors/{id}
pub async fn delete_razor(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    RazorService::delete_razor(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for razor routes, including per-razor ratings and reviews
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/razors")
            .route("", web::get().to(list_razors))
            .route("", web::post().to(create_razor))
            .route("/manufacturers", web::get().to(list_manufacturers))
            .route("/{id}", web::get().to(get_razor))
            .route("/{id}", web::put().to(update_razor))
            .route("/{id}", web::delete().to(delete_razor))
            .route("/{id}/rating", web::put().to(ratings::rate_razor))
            .route("/{id}/ratings", web::get().to(ratings::list_ratings))
            .route("/{id}/reviews", web::get().to(reviews::list_reviews))
            .route("/{id}/review", web::put().to(reviews::upsert_review)),
    );
}
