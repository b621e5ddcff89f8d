//! Postgres wiring shared by the sqlx-backed stores.

pub mod schema;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use schema::ensure_schema;

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Human-readable description of a sqlx failure for the given operation.
pub(crate) fn describe(operation: &str, err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => {
            format!("database error in {}: {}", operation, db_err.message())
        }
        sqlx::Error::PoolClosed => format!("connection pool closed during {operation}"),
        sqlx::Error::PoolTimedOut => format!("connection pool timed out during {operation}"),
        other => format!("{operation} failed: {other}"),
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
