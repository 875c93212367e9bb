// src/handlers/health.rs
// DOCUMENTATION: Liveness and database reachability
// PURPOSE: Used by the seed tool and load balancers before sending traffic

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// GET /health
/// 200 when Postgres answers, 503 otherwise
pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    let database_ok = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Health check: database unreachable: {}", e);
            false
        }
    };
    health_response(database_ok)
}

fn health_response(database_ok: bool) -> HttpResponse {
    let body = json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "service": "relife-razor",
        "version": env!("CARGO_PKG_VERSION"),
        "database": if database_ok { "ok" } else { "unavailable" },
    });

    if database_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
