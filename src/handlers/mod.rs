// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and shared extractor config

pub mod auth;
pub mod collections;
pub mod comments;
pub mod compare;
pub mod health;
pub mod profiles;
pub mod ratings;
pub mod razors;
pub mod reviews;
pub mod shares;

pub use auth::config as auth_config;
pub use collections::config as collections_config;
pub use comments::config as comments_config;
pub use compare::config as compare_config;
pub use health::config as health_config;
pub use profiles::config as profiles_config;
pub use razors::config as razors_config;
pub use reviews::config as reviews_config;
pub use shares::config as shares_config;

use crate::errors::RazorError;
use actix_web::web;

/// JSON bodies that fail to parse get the usual `{ "error": ... }` 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| RazorError::InvalidInput(err.to_string()).into())
}

/// Same for query strings
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| RazorError::InvalidInput(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    macro_rules! full_app {
        () => {{
            let pool = PgPoolOptions::new()
                .connect_lazy(&Config::for_tests().database_url)
                .unwrap();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(pool))
                    .app_data(web::Data::new(Config::for_tests()))
                    .app_data(json_config())
                    .app_data(query_config())
                    .configure(razors_config)
                    .configure(collections_config)
                    .configure(reviews_config)
                    .configure(comments_config)
                    .configure(profiles_config),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_malformed_json_is_a_400_with_error_body() {
        let app = full_app!();
        let req = test::TestRequest::post()
            .uri("/razors")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"manufacturer\":")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
    }

    #[actix_web::test]
    async fn test_bad_query_is_a_400() {
        let app = full_app!();
        let req = test::TestRequest::get()
            .uri("/razors?sort=cheapest")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_member_routes_require_a_token() {
        let app = full_app!();
        let requests = vec![
            test::TestRequest::get().uri("/collections"),
            test::TestRequest::post()
                .uri("/collections/favorites/move")
                .set_json(serde_json::json!({ "position": 2, "direction": "up" })),
            test::TestRequest::post()
                .uri("/collections/5/toggle")
                .set_json(serde_json::json!({ "kind": "owned" })),
            test::TestRequest::delete().uri("/collections/entries/3"),
            test::TestRequest::delete().uri("/razors/1"),
            test::TestRequest::post().uri("/reviews/4/like"),
            test::TestRequest::delete().uri("/comments/9"),
            test::TestRequest::get().uri("/profiles/me"),
            test::TestRequest::put()
                .uri("/profiles/me")
                .set_json(serde_json::json!({ "username": "barber_joe", "bio": "DE fan" })),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
