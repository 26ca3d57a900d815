//! Email provider implementations.
//!
//! [`SmtpProvider`] delivers through a real relay. [`RecordingEmailProvider`]
//! keeps mail in memory and is used in tests and when no SMTP host is configured.

mod memory;
mod smtp;

pub use memory::RecordingEmailProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// What the relay said about one message
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Relay-assigned id, when the relay reports one
    pub message_id: Option<String>,
    pub accepted: bool,
}

/// A rendered message addressed to one recipient
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Transport that hands verification mail to the outside world
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<DeliveryReceipt>;

    /// Short label used in log fields
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> NotificationResult<bool>;
}
