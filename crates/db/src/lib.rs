//! Postgres persistence for Clubly: schema setup, row types and the
//! repositories the API is written against.

pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects to Postgres. Approvals hold a connection only for single
/// statements, so a small pool is enough for one API instance.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to the Clubly database")?;

    tracing::debug!("Database pool ready ({} connections max)", MAX_CONNECTIONS);
    Ok(pool)
}
