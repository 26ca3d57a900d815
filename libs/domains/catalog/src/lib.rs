//! Catalog Domain
//!
//! Categories, their sub-categories, and the products sellers list under them.
//! Staff curate the category tree and review products; a product stays
//! PENDING until staff accept it, and any seller edit sends it back to review.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use handlers::{ApiDoc, CatalogRouters};
pub use models::{
    Category, LocalizedText, Product, ProductQuery, ProductResponse, ProductStatus, SubCategory,
};
pub use mongodb::MongoCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
