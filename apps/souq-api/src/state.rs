//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use core_uploads::{ReferenceSet, UploadStore};
use domain_admins::MongoAdminRepository;
use domain_catalog::MongoCatalogRepository;
use domain_notifications::{
    EmailProvider, NotificationService, RecordingEmailProvider, SmtpProvider,
};
use domain_sellers::MongoSellerRepository;
use domain_users::MongoUserRepository;
use mongodb::{Client, Database};
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;

/// Cheap to clone: the driver client, JWT keys and upload store are all
/// shared handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shares the driver's connection pool
    pub mongo_client: Client,
    pub db: Database,
    pub auth: JwtAuth,
    pub uploads: UploadStore,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client) -> eyre::Result<Self> {
        let db = mongo_client.database(config.mongodb.database());
        let auth = JwtAuth::new(&config.jwt);
        let uploads =
            UploadStore::new(&config.uploads).with_references(Arc::new(upload_references(&db)));

        let provider: Arc<dyn EmailProvider> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpProvider::new(smtp.clone())?),
            None => {
                warn!("SMTP_HOST not set; verification emails are recorded, not delivered");
                Arc::new(RecordingEmailProvider::new())
            }
        };
        let notifications = NotificationService::new(provider)?;

        Ok(Self {
            config,
            mongo_client,
            db,
            auth,
            uploads,
            notifications,
        })
    }
}

/// Every collection that can point at an uploaded file
fn upload_references(db: &Database) -> ReferenceSet {
    ReferenceSet::new()
        .with(Arc::new(MongoAdminRepository::new(db)))
        .with(Arc::new(MongoUserRepository::new(db)))
        .with(Arc::new(MongoSellerRepository::new(db)))
        .with(Arc::new(MongoCatalogRepository::new(db)))
}
