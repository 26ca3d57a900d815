use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Message};
use thiserror::Error;

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err.body_text())
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(err: MultipartRejection) -> Self {
        UploadError::Multipart(err.body_text())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => {
                AppError::BadRequest(Message::new("لم يتم رفع أي ملف", "No file uploaded"))
            }
            UploadError::UnsupportedType(_) => AppError::BadRequest(Message::new(
                "يُسمح فقط بملفات الصور",
                "Only image files are allowed",
            )),
            UploadError::Multipart(_) => AppError::BadRequest(Message::new(
                "صيغة الملف المرفوع غير صحيحة",
                "Malformed upload",
            )),
            UploadError::Io(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
