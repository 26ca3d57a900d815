use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{
    ApiResponse, Message,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
};
use tower_http::services::ServeDir;
use utoipa::{OpenApi, ToSchema};

use crate::error::{UploadError, UploadResult};
use crate::store::{StoredFile, UploadStore};

/// Multipart field carrying the file.
const FILE_FIELD: &str = "image";

/// OpenAPI documentation for the upload endpoint
#[derive(OpenApi)]
#[openapi(
    paths(upload_image),
    components(
        schemas(StoredFile, UploadForm),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Uploads", description = "Image uploads")
    )
)]
pub struct ApiDoc;

/// Multipart form accepted by `POST /upload`
#[derive(ToSchema)]
#[allow(dead_code)]
struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// `POST /upload`, to be nested under `/api`.
pub fn router(store: UploadStore, max_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(max_bytes))
        .with_state(store)
}

/// Serves stored files at `/uploads/*`. Mount at the root, not under `/api`.
pub fn static_files(store: &UploadStore) -> Router {
    Router::new().nest_service("/uploads", ServeDir::new(store.dir()))
}

/// Upload one image
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = StoredFile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_image(
    State(store): State<UploadStore>,
    multipart: Result<Multipart, MultipartRejection>,
) -> UploadResult<impl IntoResponse> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if original_name.is_empty() || bytes.is_empty() {
            return Err(UploadError::NoFile);
        }

        let stored = store.save(&original_name, &bytes).await?;
        return Ok(ApiResponse::data(stored).with_message(Message::new(
            "تم رفع الملف بنجاح",
            "File uploaded successfully",
        )));
    }

    Err(UploadError::NoFile)
}
