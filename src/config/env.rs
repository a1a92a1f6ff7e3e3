//! Configuration loading from the process environment.

use crate::config::schema::{AppConfig, StoreBackend};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid HTTP_PORT `{value}`: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid ECHO_STORE `{0}` (expected `sqlite` or `memory`)")]
    InvalidBackend(String),
}

impl AppConfig {
    /// Build the configuration from defaults plus environment overrides.
    ///
    /// `HTTP_PORT` selects the listening port (unset or empty keeps the
    /// default 8025). `ECHO_STORE` selects the store backend. A variable
    /// that is present but unparsable is an error — startup fails rather
    /// than running on a port nobody asked for.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = non_empty_var("HTTP_PORT") {
            config.server.port = port.parse().map_err(|source| ConfigError::InvalidPort {
                value: port,
                source,
            })?;
        }

        if let Some(backend) = non_empty_var("ECHO_STORE") {
            config.store.backend = match backend.to_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::InvalidBackend(backend)),
            };
        }

        Ok(config)
    }
}

/// A set-but-empty variable counts as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
