//! Bilingual (Arabic / English) message text.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationError;

/// A message carried in every envelope, in Arabic and English.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    #[schema(value_type = String, example = "تمت العملية بنجاح")]
    pub ar: Cow<'static, str>,
    #[schema(value_type = String, example = "Operation completed successfully")]
    pub en: Cow<'static, str>,
}

impl Message {
    pub const fn new(ar: &'static str, en: &'static str) -> Self {
        Self {
            ar: Cow::Borrowed(ar),
            en: Cow::Borrowed(en),
        }
    }

    pub fn owned(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: Cow::Owned(ar.into()),
            en: Cow::Owned(en.into()),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.en)
    }
}

pub const INTERNAL_ERROR: Message = Message::new("حدث خطأ داخلي في الخادم", "Internal server error");
pub const VALIDATION_FAILED: Message =
    Message::new("البيانات المدخلة غير صالحة", "Request validation failed");
pub const INVALID_BODY: Message = Message::new("صيغة الطلب غير صحيحة", "Invalid request body");
pub const INVALID_ID: Message = Message::new("المعرف غير صالح", "Invalid id");
pub const ROUTE_NOT_FOUND: Message = Message::new("المسار غير موجود", "Route not found");
pub const TOKEN_REQUIRED: Message = Message::new("التوكن مطلوب", "Token is required");
pub const INVALID_TOKEN: Message = Message::new("التوكن غير صالح", "Invalid token");
pub const ROLE_NOT_ALLOWED: Message = Message::new(
    "غير مسموح لك بالوصول إلى هذا المسار",
    "You are not allowed to access this route",
);
pub const SERVICE_UNAVAILABLE: Message =
    Message::new("الخدمة غير متاحة حاليًا", "Service temporarily unavailable");

/// Bilingual text for one failed field rule.
///
/// English comes from the rule's own `message` when the DTO sets one; Arabic is
/// looked up by the rule code, with a generic fallback.
pub fn field_error_message(field: &str, error: &ValidationError) -> Message {
    let min = error.params.get("min").map(ToString::to_string);
    let max = error.params.get("max").map(ToString::to_string);

    let (ar, en) = match error.code.as_ref() {
        "length" => match (&min, &max) {
            (Some(min), Some(max)) => (
                format!("يجب أن يكون طول {field} بين {min} و {max} حرفًا"),
                format!("{field} must be between {min} and {max} characters"),
            ),
            (Some(min), None) => (
                format!("يجب ألا يقل طول {field} عن {min} حرفًا"),
                format!("{field} must be at least {min} characters"),
            ),
            (None, Some(max)) => (
                format!("يجب ألا يزيد طول {field} عن {max} حرفًا"),
                format!("{field} must be at most {max} characters"),
            ),
            (None, None) => (
                format!("طول {field} غير صالح"),
                format!("{field} has an invalid length"),
            ),
        },
        "email" => (
            format!("{field} يجب أن يكون بريدًا إلكترونيًا صالحًا"),
            format!("{field} must be a valid email"),
        ),
        "phone" => (
            format!("{field} يجب أن يكون رقم هاتف صالحًا من 10 إلى 15 رقمًا"),
            format!("{field} must be a valid phone number of 10-15 digits"),
        ),
        "range" => (
            format!("قيمة {field} خارج النطاق المسموح"),
            format!("{field} is out of range"),
        ),
        "required" | "blank" => (format!("{field} مطلوب"), format!("{field} is required")),
        "url" => (
            format!("{field} يجب أن يكون رابطًا صالحًا"),
            format!("{field} must be a valid URL"),
        ),
        _ => (format!("{field} غير صالح"), format!("{field} is invalid")),
    };

    let en = error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or(en);

    Message::owned(ar, en)
}
