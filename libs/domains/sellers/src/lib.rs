//! Sellers Domain
//!
//! Store owner accounts. Registration returns an activation token; the seller
//! cannot log in until that token is presented to `POST /activation`.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{SellerError, SellerResult};
pub use handlers::ApiDoc;
pub use models::{Activation, Seller, SellerRegistration, SellerResponse, SellerUpdate};
pub use mongodb::MongoSellerRepository;
pub use repository::{InMemorySellerRepository, SellerRepository};
pub use service::SellerService;
