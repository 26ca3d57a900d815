//! API routes module
//!
//! Wires every domain to its MongoDB repository. Everything returned by
//! [`routes`] is nested under `/api` by `axum_helpers::build_router`.

pub mod health;

use axum::Router;
use domain_admins::{AdminService, MongoAdminRepository};
use domain_catalog::{CatalogService, MongoCatalogRepository};
use domain_sellers::{MongoSellerRepository, SellerService};
use domain_statistics::{MongoStatisticsRepository, StatisticsService};
use domain_users::{MongoUserRepository, UserService};
use tracing::info;

use crate::state::AppState;

/// Create indexes and seed the bootstrap super admin. Safe to run on every start.
pub async fn init(state: &AppState) -> eyre::Result<()> {
    let admins = MongoAdminRepository::new(&state.db);
    admins.init_indexes().await?;
    MongoUserRepository::new(&state.db).init_indexes().await?;
    MongoSellerRepository::new(&state.db).init_indexes().await?;
    MongoCatalogRepository::new(&state.db).init_indexes().await?;

    if let Some(seed) = state.config.super_admin.clone() {
        AdminService::new(admins, state.auth.clone(), state.uploads.clone())
            .ensure_super_admin(seed)
            .await?;
    }

    info!("Indexes ready");
    Ok(())
}

pub fn routes(state: &AppState) -> Router {
    let auth = state.auth.clone();
    let uploads = state.uploads.clone();

    let admins = domain_admins::handlers::router(
        AdminService::new(
            MongoAdminRepository::new(&state.db),
            auth.clone(),
            uploads.clone(),
        ),
        auth.clone(),
    );
    let statistics = domain_statistics::handlers::router(
        StatisticsService::new(MongoStatisticsRepository::new(&state.db)),
        auth.clone(),
    );
    let users = domain_users::handlers::router(
        UserService::new(
            MongoUserRepository::new(&state.db),
            auth.clone(),
            uploads.clone(),
            state.notifications.clone(),
        ),
        auth.clone(),
    );
    let sellers = domain_sellers::handlers::router(
        SellerService::new(
            MongoSellerRepository::new(&state.db),
            auth.clone(),
            uploads.clone(),
        ),
        auth.clone(),
    );
    let catalog = domain_catalog::handlers::routers(
        CatalogService::new(MongoCatalogRepository::new(&state.db), uploads.clone()),
        auth,
    );

    Router::new()
        .nest("/admins", admins.merge(statistics))
        .nest("/users", users)
        .nest("/sellers", sellers.merge(catalog.seller_products))
        .nest("/products", catalog.products)
        .nest("/categories", catalog.categories)
        .nest("/subcategories", catalog.sub_categories)
        .merge(core_uploads::router(uploads, state.config.uploads.max_bytes))
        .merge(health::router(state.clone()))
}
