// src/handlers/compare.rs
// DOCUMENTATION: Razor comparison handler

use crate::errors::RazorError;
use crate::models::CompareQuery;
use crate::services::{authenticate_optional, CompareService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /compare?ids=1,2,3
/// Up to four razors, in the order requested
pub async fn compare_razors(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<CompareQuery>,
) -> Result<impl Responder, RazorError> {
    let viewer = authenticate_optional(&req, pool.get_ref()).await?.map(|u| u.id);
    let ids = query.ids.as_deref().unwrap_or_default();
    let result = CompareService::compare(pool.get_ref(), ids, viewer).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/compare", web::get().to(compare_razors));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    #[actix_web::test]
    async fn test_bad_ids_are_rejected_before_any_query() {
        let pool = PgPoolOptions::new()
            .connect_lazy(&Config::for_tests().database_url)
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .configure(config),
        )
        .await;

        for uri in ["/compare", "/compare?ids=", "/compare?ids=1,x", "/compare?ids=1,2,3,4,5"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }
}
