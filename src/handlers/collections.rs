// src/handlers/collections.rs
// DOCUMENTATION: Personal collection handlers
// PURPOSE: Owned / wishlist / favorites lists, toggles, variants and favorite reordering

use crate::errors::RazorError;
use crate::models::{AddVariantRequest, CollectionFilter, MoveFavoriteRequest, ToggleCollectionRequest};
use crate::services::{authenticate, CollectionService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// GET /collections
pub async fn get_collections(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    filter: web::Query<CollectionFilter>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let collections = CollectionService::get_collections(pool.get_ref(), user.id, &filter).await?;
    Ok(HttpResponse::Ok().json(collections))
}

/// POST /collections/{razor_id}/toggle
pub async fn toggle(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<ToggleCollectionRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let result = CollectionService::toggle(pool.get_ref(), user, path.into_inner(), body.kind).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /collections/{razor_id}/variants
pub async fn add_variant(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddVariantRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    body.validate()?;

    let entry_id =
        CollectionService::add_variant(pool.get_ref(), user, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(json!({ "id": entry_id })))
}

/// DELETE /collections/entries/{entry_id}
pub async fn remove_entry(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    CollectionService::remove_entry(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /collections/{razor_id}/favorite
pub async fn remove_favorite(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    CollectionService::remove_favorite(pool.get_ref(), user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /collections/favorites/move
/// Swaps a favorite with its neighbour and returns the reordered list
pub async fn move_favorite(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<MoveFavoriteRequest>,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let favorites =
        CollectionService::move_favorite(pool.get_ref(), user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(favorites))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/collections")
            .route("", web::get().to(get_collections))
            .route("/favorites/move", web::post().to(move_favorite))
            .route("/entries/{entry_id}", web::delete().to(remove_entry))
            .route("/{razor_id}/toggle", web::post().to(toggle))
            .route("/{razor_id}/variants", web::post().to(add_variant))
            .route("/{razor_id}/favorite", web::delete().to(remove_favorite)),
    );
}
