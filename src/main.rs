use anyhow::Context;
use dotenvy::dotenv;
use schoolhub::logging::init_tracing;
use schoolhub::metrics::{init_metrics, metrics_app};
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub_config::ServerConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();

    match init_metrics() {
        Ok(Some(handle)) => {
            let addr = format!("0.0.0.0:{}", server_config.metrics_port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind metrics listener on {}", addr))?;
            info!(%addr, "Metrics exporter listening");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                    warn!(error = %e, "Metrics server stopped");
                }
            });
        }
        Ok(None) => info!("Observability disabled, metrics exporter not started"),
        Err(e) => warn!(error = %e, "Failed to install metrics recorder"),
    }

    let state = init_app_state().await?;
    let app = init_router(state);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "🚀 Server running");
    info!("📚 Swagger UI available at /swagger-ui, Scalar UI at /scalar");
    axum::serve(listener, app).await?;
    Ok(())
}
