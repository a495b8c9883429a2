use anyhow::{Context, Result};
use sqlx::{MySqlPool, mysql::MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

pub async fn init_db(database_url: &str, acquire_timeout: Duration) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

const SCHEMA: [(&str, &str); 3] = [
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            CHAR(36)     NOT NULL PRIMARY KEY,
            email         VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            role          VARCHAR(32)  NULL,
            created_at    TIMESTAMP    NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "revoked_tokens",
        r#"
        CREATE TABLE IF NOT EXISTS revoked_tokens (
            jti        CHAR(36) NOT NULL PRIMARY KEY,
            expires_at DATETIME NOT NULL
        )
        "#,
    ),
    (
        "leave_requests",
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            leave_id    CHAR(36)    NOT NULL PRIMARY KEY,
            employee_id CHAR(36)    NOT NULL,
            start_date  DATE        NOT NULL,
            end_date    DATE        NOT NULL,
            reason      TEXT        NOT NULL,
            leave_type  VARCHAR(16) NOT NULL,
            status      VARCHAR(16) NOT NULL DEFAULT 'Pending',
            INDEX idx_leave_employee (employee_id),
            INDEX idx_leave_start (start_date)
        )
        "#,
    ),
];

/// Create any missing tables. Safe to run on every start.
pub async fn init_schema(pool: &MySqlPool) -> Result<()> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create table {table}"))?;
        info!(table, "Table ready");
    }
    Ok(())
}

/// Revocations only matter until the token would have expired anyway.
pub async fn purge_expired_revocations(pool: &MySqlPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < UTC_TIMESTAMP()")
        .execute(pool)
        .await
        .context("Failed to purge expired revocations")?;

    info!(purged = result.rows_affected(), "Expired revocations purged");
    Ok(result.rows_affected())
}
