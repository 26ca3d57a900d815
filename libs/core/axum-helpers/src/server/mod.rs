//! Router assembly, liveness and readiness endpoints, signal-driven shutdown.

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{build_router, serve};
pub use health::{
    HealthCheckFuture, HealthResponse, ProbeResult, ReadinessReport, health_router,
    run_health_checks,
};
pub use shutdown::{Signal, wait_for_signal};
