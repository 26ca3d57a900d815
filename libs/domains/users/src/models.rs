use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use core_accounts::{DEFAULT_IMAGE, ProfileUpdate, Registration, Role, SearchText, VerificationCode};
use core_uploads::UploadStore;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Account lifecycle of a shopper
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    NotVerified,
    Verified,
    Blocked,
}

/// User document as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
    pub mobile_phone: String,
    #[serde(default)]
    pub address: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    /// Only set while `status` is BLOCKED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    /// Pending email verification code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationCode>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A new, not yet verified user holding `verification`
    pub fn new(input: Registration, password_hash: String, verification: VerificationCode) -> Self {
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
            role: Role::User,
            status: UserStatus::NotVerified,
            block_reason: None,
            verification: Some(verification),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Consume the pending code. Returns false when it is missing, wrong or expired.
    pub fn verify(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        let accepted = self
            .verification
            .as_ref()
            .is_some_and(|pending| pending.accepts(code, now));
        if accepted {
            self.status = UserStatus::Verified;
            self.verification = None;
            self.updated_at = now;
        }
        accepted
    }

    /// Block with an optional reason, or lift an existing block.
    ///
    /// Lifting restores VERIFIED, or NOTVERIFIED while a code is still pending.
    pub fn toggle_block(&mut self, reason: Option<String>) {
        if self.status == UserStatus::Blocked {
            self.status = if self.verification.is_some() {
                UserStatus::NotVerified
            } else {
                UserStatus::Verified
            };
            self.block_reason = None;
        } else {
            self.status = UserStatus::Blocked;
            self.block_reason = reason.filter(|r| !r.trim().is_empty());
        }
        self.updated_at = Utc::now();
    }

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

    pub fn matches(&self, term: &SearchText) -> bool {
        let status = self.status.to_string();
        term.matches_any(
            Some(&self.id),
            [
                self.first_name.as_str(),
                self.last_name.as_str(),
                self.email.as_str(),
                self.mobile_phone.as_str(),
                self.address.as_str(),
                status.as_str(),
            ],
        )
    }
}

/// Fields searched by the user listing
pub const SEARCH_FIELDS: [&str; 6] = [
    "firstName",
    "lastName",
    "email",
    "mobilePhone",
    "address",
    "status",
];

/// User as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
    pub mobile_phone: String,
    pub address: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: User, uploads: &UploadStore) -> Self {
        Self {
            id: user.id.to_hex(),
            image: uploads.asset_url(&user.image),
            first_name: user.first_name,
            last_name: user.last_name,
            mobile_phone: user.mobile_phone,
            address: user.address,
            email: user.email,
            role: user.role,
            status: user.status,
            block_reason: user.block_reason,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `POST /verify` body. Both fields are checked by the service so that a
/// missing one yields the dedicated message.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct VerifyRequest {
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[schema(example = "4821")]
    pub code: Option<String>,
}

/// `POST /resendVerification` body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResendRequest {
    #[validate(email)]
    pub email: String,
}

/// `PUT /blockUser/{id}` body; `{}` when no reason is given
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BlockRequest {
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}

/// What a verification attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    AlreadyVerified,
    CodeSent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User::new(
            Registration {
                first_name: "Hana".to_string(),
                last_name: "Fathy".to_string(),
                email: "Hana@X.com".to_string(),
                password: String::new(),
                mobile_phone: "0100000000".to_string(),
                address: None,
            },
            "hash".to_string(),
            VerificationCode {
                code: "1234".to_string(),
                expires_at: Utc::now() + Duration::minutes(10),
            },
        )
    }

    #[test]
    fn test_new_user_is_not_verified() {
        let user = user();
        assert_eq!(user.status, UserStatus::NotVerified);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.email, "hana@x.com");
    }

    #[test]
    fn test_verify_consumes_code() {
        let mut user = user();
        assert!(!user.verify("9999", Utc::now()));
        assert_eq!(user.status, UserStatus::NotVerified);

        assert!(user.verify("1234", Utc::now()));
        assert_eq!(user.status, UserStatus::Verified);
        assert!(user.verification.is_none());
        assert!(!user.verify("1234", Utc::now()));
    }

    #[test]
    fn test_expired_code_is_refused() {
        let mut user = user();
        assert!(!user.verify("1234", Utc::now() + Duration::minutes(11)));
    }

    #[test]
    fn test_toggle_block_restores_previous_state() {
        let mut user = user();
        user.toggle_block(Some("spam".to_string()));
        assert_eq!(user.status, UserStatus::Blocked);
        assert_eq!(user.block_reason.as_deref(), Some("spam"));

        user.toggle_block(None);
        assert_eq!(user.status, UserStatus::NotVerified);
        assert!(user.block_reason.is_none());

        user.verification = None;
        user.toggle_block(Some("  ".to_string()));
        assert!(user.block_reason.is_none());
        user.toggle_block(None);
        assert_eq!(user.status, UserStatus::Verified);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(UserStatus::NotVerified).unwrap(),
            "NOTVERIFIED"
        );
        assert_eq!(UserStatus::Blocked.to_string(), "BLOCKED");

        let doc = bson::to_document(&user()).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "NOTVERIFIED");
        assert!(doc.get_document("verification").is_ok());
        assert!(!doc.contains_key("blockReason"));
    }
}
