use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Domain counters. All of them are no-ops while observability is off.

fn when_enabled(record: impl FnOnce()) {
    if is_observability_enabled() {
        record();
    }
}

/// One policy decision, labelled by operation and caller role.
pub fn track_authorization_check(operation: &str, role: &str, allowed: bool) {
    when_enabled(|| {
        let outcome = if allowed { "allowed" } else { "denied" };
        counter!(
            "authorization_checks_total",
            "operation" => operation.to_owned(),
            "role" => role.to_owned(),
            "status" => outcome
        )
        .increment(1);
    });
}

pub fn track_user_created(role: &str) {
    when_enabled(|| counter!("users_created_total", "role" => role.to_owned()).increment(1));
}

pub fn track_user_login_success(role: &str) {
    when_enabled(|| {
        counter!("user_logins_total", "role" => role.to_owned(), "status" => "success").increment(1)
    });
}

pub fn track_user_login_failure(reason: &str) {
    when_enabled(|| {
        counter!("user_logins_total", "status" => "failure", "reason" => reason.to_owned())
            .increment(1)
    });
}

pub fn track_school_created() {
    when_enabled(|| counter!("schools_created_total").increment(1));
}

pub fn track_attendance_written(count: usize) {
    when_enabled(|| counter!("attendance_records_written_total").increment(count as u64));
}
