//! Persistence for tickets, users, and facility records.
//!
//! - [`models`] -- row structs and DTOs.
//! - [`repositories`] -- PostgreSQL queries, one struct per table.
//! - [`store`] -- the [`TicketStore`] trait the service depends on.
//! - [`memory`] -- an in-process [`TicketStore`] for tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod scope;
pub mod store;

pub use memory::MemoryTicketStore;
pub use store::{PgTicketStore, StoreError, TicketStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
