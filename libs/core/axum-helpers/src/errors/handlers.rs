use axum::{Json, http::StatusCode};

use super::{ErrorResponse, StatusText, messages};

/// Router fallback: 404 with the bilingual "route not found" message.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            status: StatusText::Fail,
            message: messages::ROUTE_NOT_FOUND,
            errors: None,
        }),
    )
}
