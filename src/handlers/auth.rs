// src/handlers/auth.rs
// DOCUMENTATION: Sign-up, sign-in and sign-out
// PURPOSE: Exchange credentials for bearer tokens

use crate::config::Config;
use crate::errors::RazorError;
use crate::models::{SigninRequest, SignupRequest};
use crate::services::AuthService;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// POST /auth/signup
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> Result<impl Responder, RazorError> {
    if let Err(e) = req.validate() {
        return Err(RazorError::ValidationError(e.to_string()));
    }

    let token = AuthService::signup(pool.get_ref(), config.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(token))
}

/// POST /auth/signin
pub async fn signin(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SigninRequest>,
) -> Result<impl Responder, RazorError> {
    let token = AuthService::signin(pool.get_ref(), config.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}

/// POST /auth/signout
/// Revokes the bearer token sent with the request
pub async fn signout(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, RazorError> {
    AuthService::signout(&req, pool.get_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/signin", web::post().to(signin))
            .route("/signout", web::post().to(signout)),
    );
}
