use super::{DeliveryReceipt, EmailProvider, OutgoingEmail};
use crate::error::NotificationResult;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// Provider that logs and keeps every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingEmailProvider {
    outbox: RwLock<Vec<OutgoingEmail>>,
}

impl RecordingEmailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages "sent" so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.read().await.clone()
    }

    /// Most recent message addressed to `to_email`.
    pub async fn last_to(&self, to_email: &str) -> Option<OutgoingEmail> {
        self.outbox
            .read()
            .await
            .iter()
            .rev()
            .find(|m| m.to_email.eq_ignore_ascii_case(to_email))
            .cloned()
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<DeliveryReceipt> {
        info!(to = %email.to_email, subject = %email.subject, "Recording email (no SMTP configured)");

        let mut outbox = self.outbox.write().await;
        outbox.push(email.clone());

        Ok(DeliveryReceipt {
            message_id: Some(format!("recorded-{}", outbox.len())),
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str, subject: &str) -> OutgoingEmail {
        OutgoingEmail {
            to_email: to.to_string(),
            subject: subject.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let provider = RecordingEmailProvider::new();
        provider.send(&mail("a@x.com", "first")).await.unwrap();
        let sent = provider.send(&mail("b@x.com", "second")).await.unwrap();

        assert!(sent.accepted);
        assert_eq!(sent.message_id.as_deref(), Some("recorded-2"));

        let outbox = provider.sent().await;
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox[0].subject, "first");
    }

    #[tokio::test]
    async fn test_last_to_finds_latest_for_recipient() {
        let provider = RecordingEmailProvider::new();
        provider.send(&mail("a@x.com", "old")).await.unwrap();
        provider.send(&mail("b@x.com", "other")).await.unwrap();
        provider.send(&mail("A@x.com", "new")).await.unwrap();

        let last = provider.last_to("a@x.com").await.unwrap();
        assert_eq!(last.subject, "new");
        assert!(provider.last_to("c@x.com").await.is_none());
    }
}
