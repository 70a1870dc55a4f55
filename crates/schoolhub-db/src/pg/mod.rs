//! PostgreSQL-backed [`Store`].
//!
//! Queries are runtime-checked (`sqlx::query_as::<_, T>`), so the crate
//! builds without a live database. Multi-row writes run in a transaction;
//! unique, foreign-key and check violations come back as
//! [`StoreError::Conflict`].

mod academic;
mod records;
mod schools;
mod users;

use crate::store::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Classifies a failed write. `what` names the row for the conflict message.
fn write_error(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return StoreError::Conflict(format!("{what} already exists")),
            Some("23503") => {
                return StoreError::Conflict(format!("{what} is referenced by other records"));
            }
            Some("23514") => {
                return StoreError::Conflict(format!("{what} violates a data constraint"));
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}

fn missing(what: &str) -> StoreError {
    StoreError::NotFound(what.to_string())
}
