// src/handlers/shares.rs
// DOCUMENTATION: Collection share endpoints
// PURPOSE: POST /api/collections/share and GET /api/collections/shared/{token}
//
// The create route authenticates before anything else, so an anonymous
// caller gets 401 even for the wrong method or a broken body.

use crate::config::Config;
use crate::errors::RazorError;
use crate::models::{ShareCreatedResponse, ShareRequest};
use crate::services::{authenticate, ShareRateLimiter, ShareService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;

/// POST /api/collections/share
pub async fn create_share(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<ShareRateLimiter>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, RazorError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let share_req = parse_body(&body)?;

    let link = ShareService::create_share(
        pool.get_ref(),
        config.get_ref(),
        limiter.get_ref(),
        user.id,
        share_req,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ShareCreatedResponse {
        success: true,
        data: link,
    }))
}

/// An empty body means "share all favorites"
fn parse_body(body: &[u8]) -> Result<ShareRequest, RazorError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ShareRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| RazorError::InvalidInput(format!("Invalid request body: {}", e)))
}

/// Any other method on the create route
async fn share_method_not_allowed(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, RazorError> {
    authenticate(&req, pool.get_ref()).await?;
    Err(RazorError::MethodNotAllowed)
}

/// GET /api/collections/shared/{token}
pub async fn get_shared(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, RazorError> {
    let token = path.into_inner();
    let shared = ShareService::get_shared(pool.get_ref(), &token, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(shared))
}

async fn method_not_allowed() -> Result<HttpResponse, RazorError> {
    Err(RazorError::MethodNotAllowed)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/collections/share")
            .route(web::post().to(create_share))
            .default_service(web::route().to(share_method_not_allowed)),
    )
    .service(
        web::resource("/api/collections/shared/{token}")
            .route(web::get().to(get_shared))
            .default_service(web::route().to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy(&Config::for_tests().database_url)
            .unwrap()
    }

    macro_rules! share_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(lazy_pool()))
                    .app_data(web::Data::new(Config::for_tests()))
                    .app_data(web::Data::new(ShareRateLimiter::per_minute(10)))
                    .configure(config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_requires_auth() {
        let app = share_app!();
        let req = test::TestRequest::post()
            .uri("/api/collections/share")
            .set_payload(r#"{"collectionType":"owned"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_auth_is_checked_before_method() {
        let app = share_app!();
        let req = test::TestRequest::get()
            .uri("/api/collections/share")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_auth_is_checked_before_body() {
        let app = share_app!();
        let req = test::TestRequest::post()
            .uri("/api/collections/share")
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_shared_rejects_other_methods() {
        let app = share_app!();
        for req in [
            test::TestRequest::post().uri("/api/collections/shared/abcDEF123_-x"),
            test::TestRequest::delete().uri("/api/collections/shared/abcDEF123_-x"),
        ] {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Method not allowed");
        }
    }

    #[actix_web::test]
    async fn test_parse_body() {
        let empty = parse_body(b"").unwrap();
        assert!(empty.collection_type.is_none());

        let req = parse_body(br#"{"collectionType":"favorites","limit":3}"#).unwrap();
        assert_eq!(req.limit, Some(3));

        assert!(matches!(
            parse_body(b"[1,2"),
            Err(RazorError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_body(br#"{"limit":"three"}"#),
            Err(RazorError::InvalidInput(_))
        ));
    }
}
