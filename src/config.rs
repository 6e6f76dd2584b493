// This project was developed with assistance from GitHub Copilot
// Environment-driven server configuration

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_SUBJECT: &str = "fake-user";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `sub` claim of every issued token
    pub token_subject: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value:?}: {source}")]
    InvalidBindAddress {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("TOKEN_SUBJECT must not be empty")]
    EmptySubject,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let raw_bind = vars
            .get("BIND_ADDRESS")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        let bind_address = raw_bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddress {
                value: raw_bind.to_string(),
                source,
            })?;

        let token_subject = vars
            .get("TOKEN_SUBJECT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_SUBJECT.to_string());
        if token_subject.is_empty() {
            return Err(ConfigError::EmptySubject);
        }

        Ok(Config {
            bind_address,
            token_subject,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            token_subject: DEFAULT_TOKEN_SUBJECT.to_string(),
        }
    }
}
