//! Notification service: renders templates and hands mail to a provider.

use crate::error::NotificationResult;
use crate::providers::{DeliveryReceipt, EmailProvider, OutgoingEmail};
use crate::templates::{TemplateEngine, VerificationCodeData};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for sending account emails.
#[derive(Clone)]
pub struct NotificationService {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
}

impl NotificationService {
    pub fn new(provider: Arc<dyn EmailProvider>) -> NotificationResult<Self> {
        Ok(Self {
            provider,
            templates: Arc::new(TemplateEngine::new()?),
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Email a verification code to a freshly registered (or re-requesting) user.
    #[instrument(skip(self, code), fields(provider = self.provider.name()))]
    pub async fn send_verification_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
        expiry_minutes: i64,
    ) -> NotificationResult<DeliveryReceipt> {
        let rendered = self.templates.render_verification_code(&VerificationCodeData {
            user_name: to_name.to_string(),
            code: code.to_string(),
            expiry_minutes,
        })?;

        let sent = self
            .provider
            .send(&OutgoingEmail {
                to_email: to_email.to_string(),
                to_name: to_name.to_string(),
                subject: rendered.subject,
                html_body: rendered.html,
                text_body: rendered.text,
            })
            .await?;

        info!(message_id = ?sent.message_id, "Verification code sent");
        Ok(sent)
    }

    pub async fn health_check(&self) -> NotificationResult<bool> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use crate::providers::{MockEmailProvider, RecordingEmailProvider};

    #[tokio::test]
    async fn test_send_verification_code_renders_and_sends() {
        let provider = Arc::new(RecordingEmailProvider::new());
        let service = NotificationService::new(provider.clone()).unwrap();

        let sent = service
            .send_verification_code("mona@x.com", "Mona Ali", "1234", 10)
            .await
            .unwrap();
        assert!(sent.accepted);

        let mail = provider.last_to("mona@x.com").await.unwrap();
        assert_eq!(mail.to_name, "Mona Ali");
        assert!(mail.text_body.contains("1234"));
        assert!(mail.html_body.contains("1234"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_propagated() {
        let mut provider = MockEmailProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationError::Delivery("relay down".to_string())));

        let service = NotificationService::new(Arc::new(provider)).unwrap();
        let result = service
            .send_verification_code("mona@x.com", "Mona", "1234", 10)
            .await;

        assert!(matches!(result, Err(NotificationError::Delivery(_))));
    }
}
