use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Message, errors::messages};
use database::mongodb::is_duplicate_key;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found")]
    CategoryNotFound,

    #[error("Sub-category not found")]
    SubCategoryNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Name already exists: {0}")]
    DuplicateName(String),

    #[error("Category still has products")]
    CategoryInUse,

    #[error("Sub-category still has products")]
    SubCategoryInUse,

    #[error("Sub-category does not belong to the selected category")]
    SubCategoryMismatch,

    #[error("Final price is greater than price")]
    FinalPriceAbovePrice,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Product belongs to another seller")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound => {
                AppError::NotFound(Message::new("القسم غير موجود", "Category not found"))
            }
            CatalogError::SubCategoryNotFound => AppError::NotFound(Message::new(
                "القسم الفرعي غير موجود",
                "Sub-category not found",
            )),
            CatalogError::ProductNotFound => {
                AppError::NotFound(Message::new("المنتج غير موجود", "Product not found"))
            }
            CatalogError::DuplicateName(_) => {
                AppError::Conflict(Message::new("الاسم موجود بالفعل", "Name already exists"))
            }
            CatalogError::CategoryInUse => AppError::BadRequest(Message::new(
                "لا يمكن حذف قسم يحتوي على منتجات",
                "Cannot delete a category that has products",
            )),
            CatalogError::SubCategoryInUse => AppError::BadRequest(Message::new(
                "لا يمكن حذف قسم فرعي يحتوي على منتجات",
                "Cannot delete a sub-category that has products",
            )),
            CatalogError::SubCategoryMismatch => AppError::BadRequest(Message::new(
                "القسم الفرعي لا يتبع القسم المختار",
                "Sub-category does not belong to the selected category",
            )),
            CatalogError::FinalPriceAbovePrice => AppError::BadRequest(Message::new(
                "السعر النهائي يجب ألا يزيد عن السعر",
                "Final price must not be greater than price",
            )),
            CatalogError::InvalidId(_) => AppError::BadRequest(messages::INVALID_ID),
            CatalogError::NotOwner => AppError::Forbidden(Message::new(
                "لا يمكنك تعديل منتج بائع آخر",
                "You can only manage your own products",
            )),
            CatalogError::Database(msg) | CatalogError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return CatalogError::DuplicateName(err.to_string());
        }
        CatalogError::Database(err.to_string())
    }
}
