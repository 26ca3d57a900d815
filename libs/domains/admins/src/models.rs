use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use core_accounts::{DEFAULT_IMAGE, ProfileUpdate, Registration, Role};
use core_uploads::UploadStore;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin document as stored in the `admins` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
    pub mobile_phone: String,
    #[serde(default)]
    pub address: String,
    pub email: String,
    /// Argon2 hash
    pub password: String,
    /// Most recently issued token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// A new active admin. `password_hash` must already be hashed.
    pub fn new(input: Registration, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            image: DEFAULT_IMAGE.to_string(),
            mobile_phone: input.mobile_phone,
            address: input.address.unwrap_or_default(),
            email: input.email.to_lowercase(),
            password: password_hash,
            token: None,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Merge the plain fields of a profile edit. Passwords are handled by the service.
    pub fn apply_update(&mut self, update: &ProfileUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.to_lowercase();
        }
        if let Some(phone) = &update.mobile_phone {
            self.mobile_phone = phone.clone();
        }
        if let Some(address) = &update.address {
            self.address = address.clone();
        }
        if let Some(image) = &update.image {
            self.image = image.clone();
        }
        self.updated_at = Utc::now();
    }

    /// Matches the listing search: names, email, phone, address, role or exact id.
    pub fn matches(&self, term: &core_accounts::SearchText) -> bool {
        let role = self.role.to_string();
        term.matches_any(
            Some(&self.id),
            [
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.email.as_str(),
                self.mobile_phone.as_str(),
                self.address.as_str(),
                role.as_str(),
            ],
        )
    }
}

/// Fields searched by listing endpoints
pub const SEARCH_FIELDS: [&str; 6] = [
    "firstName",
    "lastName",
    "email",
    "mobilePhone",
    "address",
    "role",
];

/// Admin as returned by the API (no password, no token)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    #[schema(example = "665f1c2e8b3e4a0012345678")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Absolute image URL
    pub image: String,
    pub mobile_phone: String,
    pub address: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminResponse {
    pub fn new(admin: Admin, uploads: &UploadStore) -> Self {
        Self {
            id: admin.id.to_hex(),
            image: uploads.asset_url(&admin.image),
            first_name: admin.first_name,
            last_name: admin.last_name,
            mobile_phone: admin.mobile_phone,
            address: admin.address,
            email: admin.email,
            role: admin.role,
            is_active: admin.is_active,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

/// Result of toggling an admin's block flag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatus {
    pub id: String,
    pub is_active: bool,
}

/// Bootstrap credentials for the first super admin
#[derive(Debug, Clone)]
pub struct SuperAdminSeed {
    pub email: String,
    pub password: String,
    pub mobile_phone: String,
}
