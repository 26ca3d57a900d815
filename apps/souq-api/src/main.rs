use axum_helpers::server::{build_router, health_router, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::Backoff;
use std::time::Duration;
use tracing::info;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let mongo_client =
        database::mongodb::connect_with_retry(&config.mongodb, Backoff::default()).await?;
    info!(database = config.mongodb.database(), "MongoDB connected");

    let state = AppState::new(config, mongo_client)?;
    tokio::fs::create_dir_all(state.uploads.dir()).await?;
    api::init(&state).await?;

    let router = build_router::<openapi::ApiDoc>(api::routes(&state))?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(core_uploads::static_files(&state.uploads));

    let AppState {
        config,
        mongo_client,
        ..
    } = state;
    serve(app, &config.server, SHUTDOWN_GRACE, async move {
        mongo_client.shutdown().await;
        info!("MongoDB connections closed");
    })
    .await?;

    info!("Souq API stopped");
    Ok(())
}
