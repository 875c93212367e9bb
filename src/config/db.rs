// src/config/db.rs
// DOCUMENTATION: Postgres pool and schema bootstrap
// PURPOSE: Connect once at startup and make sure every table exists

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Open the pool and prove it works with a round trip
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        .idle_timeout(Duration::from_secs(5 * 60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .connect(&config.database_url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    log::info!(
        "Database pool ready ({} connections max)",
        config.db_max_connections
    );
    Ok(pool)
}

/// Apply sql/schema.sql statement by statement.
/// Every statement is idempotent (IF NOT EXISTS), so this runs on each start.
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let statements = schema_statements(SCHEMA_SQL);
    for stmt in &statements {
        sqlx::query(stmt).execute(pool).await?;
    }
    log::info!("Schema applied ({} statements)", statements.len());
    Ok(())
}

fn schema_statements(content: &str) -> Vec<&str> {
    content
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

fn is_comment_only(stmt: &str) -> bool {
    stmt.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_splits_into_statements() {
        let statements = schema_statements(SCHEMA_SQL);
        assert!(statements.len() >= 9);
        assert!(statements
            .iter()
            .any(|s| s.contains("CREATE TABLE IF NOT EXISTS collection_shares")));
    }

    #[test]
    fn test_comment_only_chunks_are_skipped() {
        let sql = "-- header\n;\nCREATE TABLE a (id INT);\n  -- trailing\n";
        assert_eq!(schema_statements(sql), vec!["CREATE TABLE a (id INT)"]);
    }
}
