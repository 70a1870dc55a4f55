use crate::env_or;

#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 3000),
            metrics_port: env_or("METRICS_PORT", 9090),
        }
    }
}
