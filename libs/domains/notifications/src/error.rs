use core_config::ConfigError;
use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// The relay refused or could not be reached
    #[error("Email delivery failed: {0}")]
    Delivery(String),

    #[error("Email template failed to render: {0}")]
    Template(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
