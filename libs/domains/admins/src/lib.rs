//! Admins Domain
//!
//! Admin and super-admin accounts: registration, login, profile edits, and the
//! super-admin only listing, block and delete operations.
//!
//! ```text
//! handlers  → HTTP endpoints, role gates
//! service   → uniqueness, password change, super-admin protection
//! repository→ AdminRepository trait + in-memory implementation
//! mongodb   → MongoDB implementation (`admins` collection)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use core_uploads::{UploadConfig, UploadStore};
//! use domain_admins::{AdminService, MongoAdminRepository, handlers};
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let uploads = UploadStore::new(&UploadConfig::new("uploads", "http://localhost:8080"));
//!
//! let repository = MongoAdminRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(AdminService::new(repository, auth.clone(), uploads), auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{AdminError, AdminResult};
pub use handlers::ApiDoc;
pub use models::{Admin, AdminResponse, BlockStatus, SuperAdminSeed};
pub use mongodb::MongoAdminRepository;
pub use repository::{AdminRepository, InMemoryAdminRepository};
pub use service::AdminService;
