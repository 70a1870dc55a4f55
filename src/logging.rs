use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "storage/logs";

/// Wraps each request in a `request` span carrying a fresh request id, so
/// service logs emitted while handling it share the id.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );

    async move {
        debug!("Incoming request");
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        if response.status().is_server_error() {
            error!(status, latency_ms, "Server error");
        } else if response.status().is_client_error() {
            warn!(status, latency_ms, "Client error");
        } else {
            info!(status, latency_ms, "Request completed");
        }
        response
    }
    .instrument(span)
    .await
}

/// Console filter: `RUST_LOG` wins, then `LOG_LEVEL` for this crate.
fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(format!(
            "{crate}={level},schoolhub_access={level},schoolhub_db={level},tower_http=warn,hyper=info,sqlx=warn",
            crate = env!("CARGO_CRATE_NAME"),
        ))
    })
}

/// Installs the global subscriber: compact console output, a daily error log
/// and a daily JSON log, both under [`LOG_DIR`].
///
/// Falls back to console-only logging when the log directory cannot be
/// created.
pub fn init_tracing() {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter());

    if let Err(e) = std::fs::create_dir_all(LOG_DIR) {
        tracing_subscriber::registry().with(console_layer).init();
        warn!(error = %e, dir = LOG_DIR, "Could not create log directory, logging to console only");
        return;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "schoolhub.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for ingestion
    let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "schoolhub.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .init();

    info!("Tracing initialized with console and file logging");
}
