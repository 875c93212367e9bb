// src/handlers/profiles.rs
// DOCUMENTATION: Profile handlers

use crate::errors::RazorError;
use crate::models::UpdateProfileRequest;
use crate::services::{authenticate, ProfileService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// GET /profiles/me
pub async fn get_me(pool: web::Data<PgPool>, req: HttpRequest) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let profile = ProfileService::get_profile(pool.get_ref(), user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /profiles/me
pub async fn update_me(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let profile = ProfileService::update_profile(pool.get_ref(), user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /profiles/{id}
pub async fn get_profile(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, RazorError> {
    let profile = ProfileService::get_profile(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .route("/me", web::get().to(get_me))
            .route("/me", web::put().to(update_me))
            .route("/{id}", web::get().to(get_profile)),
    );
}
