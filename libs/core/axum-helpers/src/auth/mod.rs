//! Authentication and authorization.
//!
//! - [`jwt`]: HS256 token issue/verify with identity claims
//! - [`middleware`]: the token gate and the [`CurrentIdentity`] extractor
//! - [`policy`]: compile-time role allow-lists and the [`Authorized`] extractor
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{Authorized, JwtAuth, JwtConfig, Staff, require_auth};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! async fn list(caller: Authorized<Staff>) -> String { caller.claims.sub.clone() }
//!
//! let protected = Router::new()
//!     .route("/all", get(list))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, require_auth));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod policy;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, TokenError, TokenSubject};
pub use middleware::{CurrentIdentity, require_auth};
pub use policy::{
    AnyRole, Authorized, RolePolicy, SellerOnly, Staff, StaffOrUser, SuperAdminOnly, authorize,
};
