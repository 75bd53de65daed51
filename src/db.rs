//! Database connection pool and migration management.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool shared across handlers.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// Connections are created lazily and reused across HTTP requests.
///
/// # Errors
///
/// Returns an error if the connection string is invalid, the server is
/// unreachable, or authentication fails.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// The `sqlx::migrate!` macro embeds the migration files at compile time.
/// Applied migrations are tracked in the `_sqlx_migrations` table, so each
/// file runs only once.
///
/// # Errors
///
/// Returns an error if a migration file contains invalid SQL or the
/// database rejects a statement.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
