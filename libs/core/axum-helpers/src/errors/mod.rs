pub mod handlers;
pub mod messages;
pub mod responses;

pub use messages::Message;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Status tag carried by every envelope.
///
/// `FAIL` marks a client-side problem (bad input, missing resource, wrong role),
/// `ERROR` marks a server-side or credential-integrity problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusText {
    Success,
    Fail,
    Error,
}

/// One failed field rule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: Message,
}

/// Failure envelope.
///
/// ```json
/// {
///   "status": "FAIL",
///   "message": { "ar": "...", "en": "Email already exists" },
///   "errors": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: StatusText,
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Application error type that can be converted to HTTP responses.
///
/// Every domain error converts into this; it is rendered by a single
/// `IntoResponse` implementation so all failures share one envelope.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(Message),

    #[error("Conflict: {0}")]
    Conflict(Message),

    #[error("Unauthorized: {0}")]
    Unauthorized(Message),

    #[error("Invalid token: {0}")]
    InvalidToken(Message),

    #[error("Forbidden: {0}")]
    Forbidden(Message),

    #[error("Not Found: {0}")]
    NotFound(Message),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!("JSON extraction error: {}", e.body_text());
                ErrorResponse {
                    status: StatusText::Fail,
                    message: messages::INVALID_BODY,
                    errors: None,
                }
            }
            AppError::ValidationError(e) => {
                tracing::info!("Validation error: {:?}", e);
                ErrorResponse {
                    status: StatusText::Fail,
                    message: messages::VALIDATION_FAILED,
                    errors: Some(field_errors(&e)),
                }
            }
            AppError::BadRequest(message)
            | AppError::Conflict(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::NotFound(message) => {
                tracing::info!(status = status.as_u16(), "{}", message);
                ErrorResponse {
                    status: StatusText::Fail,
                    message,
                    errors: None,
                }
            }
            AppError::InvalidToken(message) => {
                tracing::info!("Token rejected: {}", message);
                ErrorResponse {
                    status: StatusText::Error,
                    message,
                    errors: None,
                }
            }
            AppError::InternalServerError(details) => {
                tracing::error!("Internal server error: {}", details);
                ErrorResponse {
                    status: StatusText::Error,
                    message: messages::INTERNAL_ERROR,
                    errors: None,
                }
            }
            AppError::ServiceUnavailable(details) => {
                tracing::warn!("Service unavailable: {}", details);
                ErrorResponse {
                    status: StatusText::Error,
                    message: messages::SERVICE_UNAVAILABLE,
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Flatten validator output into field-level bilingual errors.
///
/// Nested structs and lists are reported with dotted / indexed paths such as
/// `title.en` or `images[2]`.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_field_errors(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field,
        };
        match kind {
            ValidationErrorsKind::Field(rules) => {
                out.extend(rules.iter().map(|rule| FieldError {
                    field: path.clone(),
                    message: messages::field_error_message(&path, rule),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Rust field names are snake_case; the wire format is camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
