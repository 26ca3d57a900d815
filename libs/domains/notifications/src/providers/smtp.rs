use super::{DeliveryReceipt, EmailProvider, OutgoingEmail};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or, env_required};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info, warn};

type Transport = AsyncSmtpTransport<Tokio1Executor>;

/// Relay settings, read from `SMTP_*` variables.
///
/// `SMTP_FROM_EMAIL` falls back to `SMTP_USERNAME`, which is how hosted
/// relays such as Gmail expect it. `SMTP_USE_TLS=false` talks plain SMTP to
/// local catchers like MailHog.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Plain SMTP without credentials
    pub fn local(host: impl Into<String>, port: u16, from_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            from_email: from_email.into(),
            from_name: "Souq".to_string(),
            username: None,
            password: None,
            use_tls: false,
        }
    }

    fn sender(&self) -> NotificationResult<Mailbox> {
        mailbox(&self.from_name, &self.from_email)
    }

    fn transport(&self) -> NotificationResult<Transport> {
        let builder = if self.use_tls {
            Transport::relay(&self.host).map_err(|e| NotificationError::Delivery(e.to_string()))?
        } else {
            Transport::builder_dangerous(&self.host)
        };
        let builder = match (&self.username, &self.password) {
            (Some(user), Some(pass)) => builder.credentials(Credentials::new(user.clone(), pass.clone())),
            _ => builder,
        };
        Ok(builder.port(self.port).build())
    }
}

impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_required("SMTP_HOST")?;
        let username = env_optional("SMTP_USERNAME");
        let from_email = match env_optional("SMTP_FROM_EMAIL").or_else(|| username.clone()) {
            Some(address) => address,
            None => env_required("SMTP_FROM_EMAIL")?,
        };

        Ok(Self {
            host,
            port: env_parse_or("SMTP_PORT", 465)?,
            from_email,
            from_name: env_or_default("SMTP_FROM_NAME", "Souq"),
            username,
            password: env_optional("SMTP_PASSWORD"),
            use_tls: env_parse_or("SMTP_USE_TLS", true)?,
        })
    }
}

/// `Name <address>`, or the bare address when there is no name
fn mailbox(name: &str, address: &str) -> NotificationResult<Mailbox> {
    let email = address
        .parse()
        .map_err(|_| NotificationError::InvalidAddress(address.to_string()))?;
    let name = Some(name.trim()).filter(|n| !n.is_empty()).map(str::to_string);
    Ok(Mailbox::new(name, email))
}

/// Delivers through an SMTP relay with lettre's tokio transport
pub struct SmtpProvider {
    config: SmtpConfig,
    sender: Mailbox,
    transport: Transport,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> NotificationResult<Self> {
        Ok(Self {
            sender: config.sender()?,
            transport: config.transport()?,
            config,
        })
    }

    fn compose(&self, email: &OutgoingEmail) -> NotificationResult<Message> {
        Message::builder()
            .from(self.sender.clone())
            .to(mailbox(&email.to_name, &email.to_email)?)
            .subject(&email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotificationError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &OutgoingEmail) -> NotificationResult<DeliveryReceipt> {
        let message = self.compose(email)?;
        debug!(to = %email.to_email, relay = %self.config.host, "Handing email to SMTP relay");

        let response = self.transport.send(message).await.map_err(|e| {
            warn!(to = %email.to_email, error = %e, "SMTP relay rejected email");
            NotificationError::Delivery(e.to_string())
        })?;

        let receipt = DeliveryReceipt {
            message_id: response.message().next().map(str::to_string),
            accepted: response.is_positive(),
        };
        info!(to = %email.to_email, message_id = ?receipt.message_id, "Email relayed");
        Ok(receipt)
    }

    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| NotificationError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMTP_VARS: [&str; 7] = [
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_FROM_EMAIL",
        "SMTP_FROM_NAME",
        "SMTP_USE_TLS",
    ];

    fn only(set: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        SMTP_VARS
            .iter()
            .map(|key| (*key, set.iter().find(|(k, _)| k == key).map(|(_, v)| *v)))
            .collect()
    }

    #[test]
    fn test_sender_defaults_to_username() {
        let vars = only(&[
            ("SMTP_HOST", "smtp.gmail.com"),
            ("SMTP_USERNAME", "souq.shop@gmail.com"),
            ("SMTP_PASSWORD", "app-password"),
        ]);
        temp_env::with_vars(vars, || {
            let config = SmtpConfig::from_env().unwrap();
            assert_eq!(config.port, 465);
            assert!(config.use_tls);
            assert_eq!(config.from_email, "souq.shop@gmail.com");
            assert_eq!(config.from_name, "Souq");
        });
    }

    #[test]
    fn test_local_catcher_without_tls() {
        let vars = only(&[
            ("SMTP_HOST", "localhost"),
            ("SMTP_PORT", "1025"),
            ("SMTP_FROM_EMAIL", "noreply@souq.test"),
            ("SMTP_USE_TLS", "false"),
        ]);
        temp_env::with_vars(vars, || {
            let config = SmtpConfig::from_env().unwrap();
            assert!(!config.use_tls);
            assert_eq!(config.port, 1025);
            assert_eq!(config.username, None);
        });
    }

    #[test]
    fn test_missing_host_or_sender() {
        temp_env::with_vars(only(&[]), || {
            assert!(matches!(
                SmtpConfig::from_env(),
                Err(ConfigError::MissingEnvVar(key)) if key == "SMTP_HOST"
            ));
        });
        temp_env::with_vars(only(&[("SMTP_HOST", "localhost")]), || {
            assert!(matches!(
                SmtpConfig::from_env(),
                Err(ConfigError::MissingEnvVar(key)) if key == "SMTP_FROM_EMAIL"
            ));
        });
    }

    #[test]
    fn test_mailbox_formats() {
        let named = mailbox("Mona Ali", "mona@souq.test").unwrap();
        assert_eq!(named.name.as_deref(), Some("Mona Ali"));
        assert_eq!(named.email.to_string(), "mona@souq.test");
        assert_eq!(mailbox(" ", "mona@souq.test").unwrap().name, None);
        assert!(matches!(
            mailbox("Mona", "not an address"),
            Err(NotificationError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_compose_rejects_bad_recipient() {
        let provider =
            SmtpProvider::new(SmtpConfig::local("localhost", 1025, "noreply@souq.test")).unwrap();
        let email = OutgoingEmail {
            to_email: "not an address".to_string(),
            subject: "Verify".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            provider.compose(&email),
            Err(NotificationError::InvalidAddress(_))
        ));
    }
}
