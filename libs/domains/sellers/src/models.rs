use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use core_accounts::{
    DEFAULT_IMAGE, ProfileUpdate, Role, SearchText, validation::validate_phone,
};
use core_uploads::UploadStore;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Seller document as stored in the `sellers` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub image: String,
    pub mobile_phone: String,
    #[serde(default)]
    pub address: String,
    pub email: String,
    pub password: String,
    /// Activation token until activated, then the current session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Seller {
    /// A new seller; inactive until the activation token is presented
    pub fn new(input: SellerRegistration, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            store_name: input.store_name,
            image: DEFAULT_IMAGE.to_string(),
            mobile_phone: input.mobile_phone,
            address: input.address.unwrap_or_default(),
            email: input.email.to_lowercase(),
            password: password_hash,
            token: None,
            role: Role::Seller,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn apply_update(&mut self, update: &SellerUpdate) {
        let profile = &update.profile;
        if let Some(first_name) = &profile.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &profile.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(store_name) = &update.store_name {
            self.store_name = store_name.clone();
        }
        if let Some(email) = &profile.email {
            self.email = email.to_lowercase();
        }
        if let Some(phone) = &profile.mobile_phone {
            self.mobile_phone = phone.clone();
        }
        if let Some(address) = &profile.address {
            self.address = address.clone();
        }
        if let Some(image) = &profile.image {
            self.image = image.clone();
        }
        self.updated_at = Utc::now();
    }

    pub fn matches(&self, term: &SearchText) -> bool {
        term.matches_any(
            Some(&self.id),
            [
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.store_name.as_str(),
                self.email.as_str(),
                self.mobile_phone.as_str(),
                self.address.as_str(),
            ],
        )
    }
}

pub const SEARCH_FIELDS: [&str; 6] = [
    "firstName",
    "lastName",
    "storeName",
    "email",
    "mobilePhone",
    "address",
];

/// Seller sign-up body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerRegistration {
    #[validate(length(min = 3, max = 20))]
    pub first_name: String,
    #[validate(length(min = 3, max = 20))]
    pub last_name: String,
    #[validate(length(min = 3, max = 50))]
    #[schema(example = "Nile Crafts")]
    pub store_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 9, max = 25))]
    pub password: String,
    #[validate(custom(function = "validate_phone"))]
    pub mobile_phone: String,
    #[validate(length(min = 5, max = 100))]
    pub address: Option<String>,
}

const STORE_NAME_LEN: (u64, u64) = (3, 50);

/// Partial seller edit: the shared profile fields plus `storeName`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerUpdate {
    pub store_name: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

/// Profile rules plus the store name, reported as flat top-level fields.
impl Validate for SellerUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.profile.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let (min, max) = STORE_NAME_LEN;
        if let Some(store_name) = &self.store_name {
            let len = store_name.chars().count() as u64;
            if len < min || len > max {
                let mut error = ValidationError::new("length");
                error.add_param(Cow::from("min"), &min);
                error.add_param(Cow::from("max"), &max);
                errors.add("store_name", error);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Seller as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub image: String,
    pub mobile_phone: String,
    pub address: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SellerResponse {
    pub fn new(seller: Seller, uploads: &UploadStore) -> Self {
        Self {
            id: seller.id.to_hex(),
            image: uploads.asset_url(&seller.image),
            first_name: seller.first_name,
            last_name: seller.last_name,
            store_name: seller.store_name,
            mobile_phone: seller.mobile_phone,
            address: seller.address,
            email: seller.email,
            role: seller.role,
            is_active: seller.is_active,
            created_at: seller.created_at,
            updated_at: seller.updated_at,
        }
    }
}

/// `POST /activation` body. The gate reads the token from here.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub activation_token: String,
}

/// Whether activation changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated,
    AlreadyActive,
}
