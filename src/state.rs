use std::sync::Arc;

use schoolhub_config::{CorsConfig, DatabaseConfig, JwtConfig};
use schoolhub_db::{PgStore, Store, init_db_pool, run_migrations};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            store,
            jwt_config,
            cors_config,
        }
    }
}

/// Connects to PostgreSQL, applies pending migrations and builds the state
/// from environment configuration.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env()
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = init_db_pool(&database_config).await?;
    run_migrations(&pool).await?;

    Ok(AppState::new(
        Arc::new(PgStore::new(pool)),
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
