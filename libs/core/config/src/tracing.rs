use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Workspace crates that log at `debug` during development
const OWN_CRATES: [&str; 8] = [
    "souq_api",
    "axum_helpers",
    "domain_admins",
    "domain_users",
    "domain_sellers",
    "domain_catalog",
    "domain_statistics",
    "domain_notifications",
];

/// Colored eyre reports. Call first in `main`; later calls are no-ops.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter used when `RUST_LOG` is unset
fn default_directives(environment: &Environment) -> String {
    if environment.is_production() {
        return "info,tower_http=info,mongodb=warn,lettre=warn".to_string();
    }
    let own = OWN_CRATES.map(|name| format!("{name}=debug")).join(",");
    format!("info,{own},tower_http=debug,mongodb=info")
}

/// JSON lines in production, pretty output otherwise, both with an
/// [`tracing_error::ErrorLayer`] so eyre reports carry span traces.
/// `RUST_LOG` replaces the default filter. Repeated calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}
