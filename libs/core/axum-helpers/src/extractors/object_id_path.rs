//! ObjectId path parameter extractor.

use crate::errors::{AppError, messages};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

/// Extractor for a single ObjectId path parameter.
///
/// A malformed id is rejected with 400 before the handler runs.
///
/// # Example
/// ```ignore
/// async fn get_admin(ObjectIdPath(id): ObjectIdPath) -> String {
///     id.to_hex()
/// }
///
/// let app = Router::new().route("/admins/{id}", get(get_admin));
/// ```
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        ObjectId::parse_str(&id).map(ObjectIdPath).map_err(|_| {
            tracing::debug!(id = %id, "Rejected malformed ObjectId");
            AppError::BadRequest(messages::INVALID_ID).into_response()
        })
    }
}
