use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Message, TokenError};
use core_accounts::{PasswordChangeError, PasswordError};
use database::mongodb::{duplicate_key_field, is_duplicate_key};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SellerError {
    #[error("Seller not found")]
    NotFound,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Mobile phone already registered: {0}")]
    DuplicatePhone(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Seller account is not activated")]
    NotActivated,

    #[error("Sellers may only edit their own profile")]
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

pub type SellerResult<T> = Result<T, SellerError>;

impl From<SellerError> for AppError {
    fn from(err: SellerError) -> Self {
        match err {
            SellerError::NotFound => {
                AppError::NotFound(Message::new("البائع غير موجود", "Seller not found"))
            }
            SellerError::DuplicateEmail(_) => AppError::Conflict(Message::new(
                "البريد الالكتروني موجود بالفعل",
                "Email already exists",
            )),
            SellerError::DuplicatePhone(_) => AppError::Conflict(Message::new(
                "رقم الهاتف موجود بالفعل",
                "Mobile phone already exists",
            )),
            SellerError::InvalidCredentials => AppError::Unauthorized(Message::new(
                "البريد الالكتروني او كلمة المرور غير صحيحة",
                "Email or password is not correct",
            )),
            SellerError::NotActivated => AppError::Forbidden(Message::new(
                "برجاء تفعيل حسابك اولا",
                "Please activate your account first",
            )),
            SellerError::NotOwner => AppError::Forbidden(Message::new(
                "لا يمكنك تعديل حساب آخر",
                "You can only edit your own account",
            )),
            SellerError::PasswordChange(PasswordChangeError::CurrentRequired) => {
                AppError::BadRequest(Message::new(
                    "برجاء ادخال كلمة المرور الحالية",
                    "Please enter your current password",
                ))
            }
            SellerError::PasswordChange(PasswordChangeError::CurrentIncorrect) => {
                AppError::BadRequest(Message::new(
                    "كلمة المرور الحالية غير صحيحة",
                    "Current password is not correct",
                ))
            }
            SellerError::PasswordChange(PasswordChangeError::Hash(e)) => {
                AppError::InternalServerError(e.to_string())
            }
            SellerError::Token(e) => e.into(),
            SellerError::Database(msg) | SellerError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for SellerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for SellerError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return match duplicate_key_field(&err).as_deref() {
                Some("mobilePhone") => SellerError::DuplicatePhone(err.to_string()),
                _ => SellerError::DuplicateEmail(err.to_string()),
            };
        }
        SellerError::Database(err.to_string())
    }
}

impl From<PasswordError> for SellerError {
    fn from(err: PasswordError) -> Self {
        SellerError::Internal(err.to_string())
    }
}
