//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "status": "ERROR",
        "message": { "ar": "حدث خطأ داخلي في الخادم", "en": "Internal server error" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "status": "FAIL",
        "message": { "ar": "البيانات المدخلة غير صالحة", "en": "Request validation failed" },
        "errors": [{
            "field": "firstName",
            "message": {
                "ar": "يجب أن يكون طول firstName بين 3 و 20 حرفًا",
                "en": "firstName must be between 3 and 20 characters"
            }
        }]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid id",
    content_type = "application/json",
    example = json!({
        "status": "FAIL",
        "message": { "ar": "المعرف غير صالح", "en": "Invalid id" }
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Duplicate email or phone",
    content_type = "application/json",
    example = json!({
        "status": "FAIL",
        "message": { "ar": "البريد الإلكتروني مستخدم بالفعل", "en": "Email already exists" }
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status": "FAIL",
        "message": { "ar": "غير موجود", "en": "Not found" }
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing or invalid token",
    content_type = "application/json",
    example = json!({
        "status": "ERROR",
        "message": { "ar": "التوكن غير صالح", "en": "Invalid token" }
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Forbidden - role not allowed or account not active",
    content_type = "application/json",
    example = json!({
        "status": "FAIL",
        "message": {
            "ar": "غير مسموح لك بالوصول إلى هذا المسار",
            "en": "You are not allowed to access this route"
        }
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);
