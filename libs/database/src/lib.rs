//! MongoDB plumbing shared by the Souq services: connecting with backoff,
//! readiness pings, unique indexes, paging and text search.
//!
//! The `config` feature adds `core_config::FromEnv` for [`mongodb::MongoConfig`].

pub mod backoff;
pub mod error;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use backoff::Backoff;
pub use error::{DatabaseError, DatabaseResult};
