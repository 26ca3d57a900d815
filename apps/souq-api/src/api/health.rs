//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// `GET /ready`, nested under `/api`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, the uploads directory exists and the
/// mail provider is reachable; 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![
        (
            "mongodb",
            Box::pin(async {
                database::mongodb::ping(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "uploads",
            Box::pin(async {
                match tokio::fs::metadata(state.uploads.dir()).await {
                    Ok(meta) if meta.is_dir() => Ok(()),
                    Ok(_) => Err("not a directory".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }),
        ),
        (
            "mail",
            Box::pin(async {
                let provider = state.notifications.provider_name();
                match state.notifications.health_check().await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(format!("{provider} relay refused the connection")),
                    Err(e) => Err(e.to_string()),
                }
            }),
        ),
    ];

    run_health_checks(checks).await
}
