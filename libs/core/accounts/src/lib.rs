//! Account primitives shared by every identity domain.
//!
//! - [`role`]: the closed set of roles and role allow-lists
//! - [`password`]: Argon2 hashing and verification
//! - [`verification`]: short-lived numeric email codes
//! - [`search`]: free-text search terms shared by MongoDB and in-memory repositories
//! - [`pagination`]: page requests and page results
//! - [`profile`]: registration, login and profile-edit bodies
//! - [`validation`]: custom field validators used by request DTOs

pub mod pagination;
pub mod password;
pub mod profile;
pub mod role;
pub mod search;
pub mod validation;
pub mod verification;

pub use pagination::{Page, PageQuery};
pub use password::{
    PasswordChangeError, PasswordError, hash_password, resolve_password_change, verify_password,
};
pub use profile::{
    Actor, Credentials, DEFAULT_IMAGE, ProfileUpdate, Registration, TokenResponse,
};
pub use role::{Role, RoleSet};
pub use search::SearchText;
pub use verification::VerificationCode;
