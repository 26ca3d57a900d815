use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Message, TokenError};
use core_accounts::{PasswordChangeError, PasswordError};
use database::mongodb::{duplicate_key_field, is_duplicate_key};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Admin not found")]
    NotFound,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Mobile phone already registered: {0}")]
    DuplicatePhone(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Admin account is blocked")]
    Blocked,

    #[error("Super admin accounts cannot be modified this way")]
    SuperAdminProtected,

    #[error("Admins may only edit their own profile")]
    NotOwner,

    #[error(transparent)]
    PasswordChange(#[from] PasswordChangeError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

/// Convert AdminError to AppError for standardized error responses
impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound => AppError::NotFound(Message::new(
                "هذا الحساب غير موجود",
                "This account does not exist",
            )),
            AdminError::DuplicateEmail(_) => {
                AppError::Conflict(Message::new("الادمن موجود بالفعل", "Admin already exists"))
            }
            AdminError::DuplicatePhone(_) => AppError::Conflict(Message::new(
                "رقم الهاتف موجود بالفعل",
                "Mobile phone already exists",
            )),
            AdminError::InvalidCredentials => AppError::Unauthorized(Message::new(
                "البريد الالكتروني او كلمة المرور غير صحيحة",
                "Email or password is not correct",
            )),
            AdminError::Blocked => AppError::Forbidden(Message::new(
                "هذا الحساب محظور",
                "This account is blocked",
            )),
            AdminError::SuperAdminProtected => AppError::Forbidden(Message::new(
                "لا يمكن حذف أو حظر هذا الحساب",
                "This account can't be deleted or blocked",
            )),
            AdminError::NotOwner => AppError::Forbidden(Message::new(
                "لا يمكنك تعديل حساب آخر",
                "You can only edit your own account",
            )),
            AdminError::PasswordChange(PasswordChangeError::CurrentRequired) => {
                AppError::BadRequest(Message::new(
                    "برجاء ادخال كلمة المرور الحالية",
                    "Please enter your current password",
                ))
            }
            AdminError::PasswordChange(PasswordChangeError::CurrentIncorrect) => {
                AppError::BadRequest(Message::new(
                    "كلمة المرور الحالية غير صحيحة",
                    "Current password is not correct",
                ))
            }
            AdminError::PasswordChange(PasswordChangeError::Hash(e)) => {
                AppError::InternalServerError(e.to_string())
            }
            AdminError::Token(e) => e.into(),
            AdminError::Database(msg) | AdminError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for AdminError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return match duplicate_key_field(&err).as_deref() {
                Some("mobilePhone") => AdminError::DuplicatePhone(err.to_string()),
                _ => AdminError::DuplicateEmail(err.to_string()),
            };
        }
        AdminError::Database(err.to_string())
    }
}

impl From<PasswordError> for AdminError {
    fn from(err: PasswordError) -> Self {
        AdminError::Internal(err.to_string())
    }
}
