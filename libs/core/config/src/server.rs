use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::fmt;
use std::net::Ipv4Addr;

const DEFAULT_PORT: u16 = 8080;

/// Where the HTTP listener binds (`HOST`, `PORT`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, as passed to the TCP listener
    pub fn address(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let fallback = Self::default();
        Ok(Self {
            host: env_or_default("HOST", &fallback.host),
            port: env_parse_or("PORT", fallback.port)?,
        })
    }
}
