//! PostgreSQL connection settings.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 10)

use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Loads the database settings. Fails when `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            url: env::var("DATABASE_URL")?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
        })
    }
}
