//! Outgoing account mail for Souq.
//!
//! [`NotificationService`] renders bilingual verification emails with
//! handlebars and hands them to an [`EmailProvider`]: [`SmtpProvider`] in
//! deployments, [`RecordingEmailProvider`] in tests and when no relay is set.

pub mod error;
pub mod providers;
pub mod service;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use providers::{
    DeliveryReceipt, EmailProvider, OutgoingEmail, RecordingEmailProvider, SmtpConfig,
    SmtpProvider,
};
pub use service::NotificationService;
pub use templates::TemplateEngine;
