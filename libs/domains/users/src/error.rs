use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Message, TokenError};
use core_accounts::{PasswordChangeError, PasswordError};
use database::mongodb::{duplicate_key_field, is_duplicate_key};
use domain_notifications::NotificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Mobile phone already registered: {0}")]
    DuplicatePhone(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not verified")]
    NotVerified,

    #[error("Account is blocked")]
    Blocked(Option<String>),

    #[error("Users may only edit their own profile")]
    NotOwner,

    #[error("Email and verification code are required")]
    MissingVerificationFields,

    #[error("Invalid or expired verification code")]
    InvalidCode,

    #[error(transparent)]
    PasswordChange(#[from] PasswordChangeError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Failed to send verification email: {0}")]
    Notification(#[from] NotificationError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => {
                AppError::NotFound(Message::new("المستخدم غير موجود", "User not found"))
            }
            UserError::DuplicateEmail(_) => AppError::Conflict(Message::new(
                "البريد الالكتروني موجود بالفعل",
                "Email already exists",
            )),
            UserError::DuplicatePhone(_) => AppError::Conflict(Message::new(
                "رقم الهاتف موجود بالفعل",
                "Mobile phone already exists",
            )),
            UserError::InvalidCredentials => AppError::Unauthorized(Message::new(
                "البريد الالكتروني او كلمة المرور غير صحيحة",
                "Email or password is not correct",
            )),
            UserError::NotVerified => AppError::Forbidden(Message::new(
                "برجاء تفعيل حسابك اولا",
                "Please verify your account first",
            )),
            UserError::Blocked(None) => AppError::Forbidden(Message::new(
                "هذا الحساب محظور",
                "This account is blocked",
            )),
            UserError::Blocked(Some(reason)) => AppError::Forbidden(Message::owned(
                format!("هذا الحساب محظور: {reason}"),
                format!("This account is blocked: {reason}"),
            )),
            UserError::NotOwner => AppError::Forbidden(Message::new(
                "لا يمكنك تعديل حساب آخر",
                "You can only edit your own account",
            )),
            UserError::MissingVerificationFields => AppError::BadRequest(Message::new(
                "البريد الالكتروني ورمز التحقق مطلوبان",
                "Email and verification code are required",
            )),
            UserError::InvalidCode => AppError::BadRequest(Message::new(
                "رمز التحقق غير صحيح او منتهي الصلاحية",
                "Invalid or expired verification code",
            )),
            UserError::PasswordChange(PasswordChangeError::CurrentRequired) => {
                AppError::BadRequest(Message::new(
                    "برجاء ادخال كلمة المرور الحالية",
                    "Please enter your current password",
                ))
            }
            UserError::PasswordChange(PasswordChangeError::CurrentIncorrect) => {
                AppError::BadRequest(Message::new(
                    "كلمة المرور الحالية غير صحيحة",
                    "Current password is not correct",
                ))
            }
            UserError::PasswordChange(PasswordChangeError::Hash(e)) => {
                AppError::InternalServerError(e.to_string())
            }
            UserError::Token(e) => e.into(),
            UserError::Notification(e) => AppError::InternalServerError(e.to_string()),
            UserError::Database(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return match duplicate_key_field(&err).as_deref() {
                Some("mobilePhone") => UserError::DuplicatePhone(err.to_string()),
                _ => UserError::DuplicateEmail(err.to_string()),
            };
        }
        UserError::Database(err.to_string())
    }
}

impl From<PasswordError> for UserError {
    fn from(err: PasswordError) -> Self {
        UserError::Internal(err.to_string())
    }
}
