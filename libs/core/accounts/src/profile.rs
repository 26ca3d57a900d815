//! Request/response bodies shared by the admin, user and seller endpoints.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::role::Role;
use crate::validation::validate_phone;

/// Stored image path for accounts that never uploaded one.
pub const DEFAULT_IMAGE: &str = "uploads/user-default.png";

/// Sign-up body for admins and users
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 3, max = 20))]
    #[schema(example = "Mona")]
    pub first_name: String,
    #[validate(length(min = 3, max = 20))]
    #[schema(example = "Ali")]
    pub last_name: String,
    #[validate(email)]
    #[schema(example = "mona@example.com")]
    pub email: String,
    #[validate(length(min = 9, max = 25))]
    #[schema(example = "s3cret-pass")]
    pub password: String,
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "01001234567")]
    pub mobile_phone: String,
    #[validate(length(min = 5, max = 100))]
    pub address: Option<String>,
}

/// Login body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(email)]
    #[schema(example = "mona@example.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "s3cret-pass")]
    pub password: String,
}

/// Partial profile edit. Absent fields are left untouched.
///
/// `newPassword` requires `currentPassword`. `image` is a path returned by
/// `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 3, max = 20))]
    pub first_name: Option<String>,
    #[validate(length(min = 3, max = 20))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub mobile_phone: Option<String>,
    #[validate(length(min = 5, max = 100))]
    pub address: Option<String>,
    pub image: Option<String>,
    #[validate(length(min = 9, max = 25))]
    pub current_password: Option<String>,
    #[validate(length(min = 9, max = 25))]
    pub new_password: Option<String>,
}

impl ProfileUpdate {
    /// The email being set, when it differs from `current` (case-insensitive).
    pub fn changed_email<'a>(&'a self, current: &str) -> Option<&'a str> {
        self.email
            .as_deref()
            .filter(|e| !e.eq_ignore_ascii_case(current))
    }

    /// The phone being set, when it differs from `current`.
    pub fn changed_phone<'a>(&'a self, current: &str) -> Option<&'a str> {
        self.mobile_phone.as_deref().filter(|p| *p != current)
    }
}

/// The authenticated caller performing a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: ObjectId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: ObjectId, role: Role) -> Self {
        Self { id, role }
    }

    /// The caller is acting on their own record
    pub fn is_self(&self, target: ObjectId) -> bool {
        self.id == target
    }

    /// Self, or any staff role
    pub fn is_self_or_staff(&self, target: ObjectId) -> bool {
        self.is_self(target) || self.role.is_staff()
    }
}

/// `{ "token": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
