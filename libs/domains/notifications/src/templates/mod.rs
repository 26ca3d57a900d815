//! Email template rendering engine.
//!
//! Handlebars templates for the mail the marketplace sends. Every message is
//! bilingual: Arabic first, English second.

use crate::error::{NotificationError, NotificationResult};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
    pub subject: String,
}

/// Data for the account verification email.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationCodeData {
    pub user_name: String,
    pub code: String,
    pub expiry_minutes: i64,
}

/// Template engine for rendering email templates.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in [
            ("verification_code_html", VERIFICATION_CODE_HTML_TEMPLATE),
            ("verification_code_text", VERIFICATION_CODE_TEXT_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| NotificationError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        Ok(Self { handlebars })
    }

    fn render<T: Serialize>(&self, template_name: &str, data: &T) -> NotificationResult<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| NotificationError::Template(e.to_string()))
    }

    /// Render the email carrying a 4-digit verification code.
    pub fn render_verification_code(&self, data: &VerificationCodeData) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.user_name, "Rendering verification code email");

        Ok(RenderedEmail {
            html: self.render("verification_code_html", data)?,
            text: self.render("verification_code_text", data)?,
            subject: "رمز التحقق | Verification code".to_string(),
        })
    }
}

const VERIFICATION_CODE_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Verification code</title></head>
<body style="font-family: Arial, sans-serif; color: #222;">
  <div dir="rtl" lang="ar">
    <p>مرحبًا {{user_name}}،</p>
    <p>رمز التحقق الخاص بك هو:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{{code}}</p>
    <p>ينتهي هذا الرمز خلال {{expiry_minutes}} دقائق.</p>
  </div>
  <hr>
  <div dir="ltr" lang="en">
    <p>Hello {{user_name}},</p>
    <p>Your verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{{code}}</p>
    <p>This code expires in {{expiry_minutes}} minutes.</p>
  </div>
</body>
</html>"#;

const VERIFICATION_CODE_TEXT_TEMPLATE: &str = r#"مرحبًا {{user_name}}،
رمز التحقق الخاص بك هو: {{code}}
ينتهي هذا الرمز خلال {{expiry_minutes}} دقائق.

Hello {{user_name}},
Your verification code is: {{code}}
This code expires in {{expiry_minutes}} minutes."#;
