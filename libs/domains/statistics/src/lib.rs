//! Statistics Domain
//!
//! Read-only dashboard figures for staff: how many admins, users, sellers,
//! products and orders exist, and order revenue for each of the last six
//! calendar months.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{StatisticsError, StatisticsResult};
pub use handlers::ApiDoc;
pub use models::{EntityCounts, MonthlySales, Statistics};
pub use mongodb::MongoStatisticsRepository;
pub use repository::{InMemoryStatisticsRepository, StatisticsRepository};
pub use service::StatisticsService;
