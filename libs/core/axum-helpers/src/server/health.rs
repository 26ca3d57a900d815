use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

/// `GET /health` body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// One named dependency probe
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// `GET /ready` body: overall status plus one entry per probe
#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    pub checks: BTreeMap<String, ProbeResult>,
}

#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Await every probe concurrently. 200 when all pass, 503 otherwise.
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> (StatusCode, Json<ReadinessReport>) {
    let (names, probes): (Vec<_>, Vec<_>) = checks.into_iter().unzip();
    let outcomes = join_all(probes).await;

    let checks: BTreeMap<_, _> = names
        .into_iter()
        .zip(outcomes)
        .map(|(name, outcome)| {
            if let Err(e) = &outcome {
                tracing::error!(check = name, error = %e, "Readiness probe failed");
            }
            let result = ProbeResult {
                healthy: outcome.is_ok(),
                error: outcome.err(),
            };
            (name.to_string(), result)
        })
        .collect();

    let ready = checks.values().all(|c| c.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let report = ReadinessReport {
        status: if ready { "ready" } else { "not ready" },
        checks,
    };
    (status, Json(report))
}

async fn liveness(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// `GET /health`, answered while the process is up
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .with_state(app_info)
}
