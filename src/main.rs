// src/main.rs
// DOCUMENTATION: relife-razor HTTP service
// PURPOSE: Wire config, Postgres, the share limiter and all routes together

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware, web, App, HttpServer};
use config::Config;
use services::{start_cleanup_task, start_token_sweep, ShareRateLimiter};
use sqlx::PgPool;
use std::io;

/// Seconds between two sweeps of idle rate-limit windows
const LIMITER_SWEEP_SECONDS: u64 = 300;

/// Seconds between two sweeps of expired session tokens
const TOKEN_SWEEP_SECONDS: u64 = 3600;

fn init_logging(config: &Config) {
    // RUST_LOG wins over LOG_LEVEL
    if std::env::var("RUST_LOG").is_err() {
        let filter = if config.log_level.is_empty() {
            "info,actix_web=info,sqlx=warn"
        } else {
            config.log_level.as_str()
        };
        std::env::set_var("RUST_LOG", filter);
    }
    env_logger::init();
}

async fn prepare_database(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = config::init_db_pool(config).await?;
    config::apply_schema(&pool).await?;
    Ok(pool)
}

/// Every route of the API
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(handlers::health_config)
        .configure(handlers::auth_config)
        .configure(handlers::razors_config)
        .configure(handlers::collections_config)
        .configure(handlers::reviews_config)
        .configure(handlers::comments_config)
        .configure(handlers::compare_config)
        .configure(handlers::profiles_config)
        .configure(handlers::shares_config);
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }
    init_logging(&config);

    log::info!(
        "relife-razor {} starting ({}) on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.environment,
        config.server_address,
        config.server_port
    );

    let pool = match prepare_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Database setup failed: {}", e);
            std::process::exit(1);
        }
    };

    start_token_sweep(pool.clone(), TOKEN_SWEEP_SECONDS);

    let limiter = ShareRateLimiter::per_minute(config.share_rate_per_minute);
    start_cleanup_task(limiter.clone(), LIMITER_SWEEP_SECONDS);
    log::info!(
        "Share links: {} per user per minute, valid {} days",
        config.share_rate_per_minute,
        config.share_ttl_days
    );

    let bind_addr = (config.server_address.clone(), config.server_port);
    let pool = web::Data::new(pool);
    let limiter = web::Data::new(limiter);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(limiter.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
