use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::backoff::{Backoff, retry};
use crate::error::{DatabaseError, DatabaseResult};

fn client_options(config: &MongoConfig, mut options: ClientOptions) -> ClientOptions {
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    options.app_name = config.app_name.clone();
    options
}

/// Build a client and wait for the first `ping` to succeed.
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    let options = client_options(config, ClientOptions::parse(config.url()).await?);
    let client = Client::with_options(options)?;
    super::ping(&client.database(config.database())).await?;
    Ok(client)
}

/// [`connect`], retried per `backoff` while MongoDB is still starting up.
pub async fn connect_with_retry(config: &MongoConfig, backoff: Backoff) -> DatabaseResult<Client> {
    info!(url = %config.redacted_url(), database = config.database(), "Connecting to MongoDB");
    retry(backoff, "MongoDB connect", || connect(config))
        .await
        .map_err(|(attempts, err)| DatabaseError::Unreachable {
            attempts,
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_settings_are_applied() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "souq")
            .with_app_name("souq_api");
        let options = client_options(&config, ClientOptions::default());
        assert_eq!(options.max_pool_size, Some(config.max_pool_size));
        assert_eq!(options.app_name.as_deref(), Some("souq_api"));
    }

    #[tokio::test]
    async fn test_bad_scheme_is_reported_unreachable() {
        let config = MongoConfig::with_database("postgres://localhost", "souq");
        let err = connect_with_retry(&config, Backoff::default().attempts(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Unreachable { attempts: 1, .. }));
    }
}
