//! # SchoolHub DB
//!
//! Persistence for the SchoolHub API.
//!
//! - [`init_db_pool`] / [`run_migrations`]: PostgreSQL pool and schema
//! - [`Store`]: the object-safe persistence trait everything else consumes
//! - [`PgStore`]: the sqlx/Postgres implementation
//! - `MemoryStore` (feature `test-utils`): in-memory implementation for
//!   tests and demos
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::DatabaseConfig;
//! use schoolhub_db::{PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let store = std::sync::Arc::new(PgStore::new(pool));
//! ```

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod pg;
pub mod store;

pub use pg::PgStore;
pub use sqlx::PgPool;
pub use store::{
    AcademicStore, RecordStore, SchoolStore, Store, StoreError, StoreResult, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

use schoolhub_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Opens a PostgreSQL connection pool sized from `config`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;
    info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );
    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
