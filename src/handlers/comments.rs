// src/handlers/comments.rs
// DOCUMENTATION: Comment handlers
// PURPOSE: Threaded comments under /reviews/{id}/comments and /comments/{id}

use crate::errors::RazorError;
use crate::models::CreateCommentRequest;
use crate::services::{authenticate, CommentService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// GET /reviews/{id}/comments
/// Returns root comments with their replies nested
pub async fn list_comments(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let tree = CommentService::list_for_review(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tree))
}

/// POST /reviews/{id}/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateCommentRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    body.validate()?;

    let comment =
        CommentService::create_comment(pool.get_ref(), user, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    CommentService::delete_comment(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/comments/{id}", web::delete().to(delete_comment));
}
