//! Users Domain
//!
//! Shopper accounts. Registration emails a 4-digit code; the account stays
//! NOTVERIFIED (and cannot log in) until `POST /verify` accepts it.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{User, UserResponse, UserStatus, VerificationOutcome};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
