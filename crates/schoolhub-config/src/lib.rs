//! # SchoolHub Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: Allowed CORS origins
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: Listen ports for the API and the metrics exporter
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let database_config = DatabaseConfig::from_env()?;
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
