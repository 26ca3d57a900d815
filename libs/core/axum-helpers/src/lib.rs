//! # Axum Helpers
//!
//! Shared HTTP plumbing for the marketplace API.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT issue/verify, the token gate and role allow-lists
//! - **[`errors`]**: `AppError` and the bilingual failure envelope
//! - **[`response`]**: the `{status, data, message}` success envelope
//! - **[`extractors`]**: `ValidatedJson`, `ObjectIdPath`
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use auth::{
    AnyRole, Authorized, CurrentIdentity, JwtAuth, JwtClaims, JwtConfig, SellerOnly, Staff,
    StaffOrUser, SuperAdminOnly, TokenError, TokenSubject, require_auth,
};
pub use errors::{AppError, AppResult, ErrorResponse, FieldError, Message, StatusText};
pub use extractors::{ObjectIdPath, ValidatedJson};
pub use response::ApiResponse;
pub use server::{HealthCheckFuture, build_router, health_router, run_health_checks, serve};
