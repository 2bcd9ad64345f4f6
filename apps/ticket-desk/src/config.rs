//! Configuration management for the ticket desk.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that are missing or fail to parse fall back to their default.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,ticket_desk=debug,tower_http=debug";

/// Errors raised while turning configuration into runtime values
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `HOST`/`PORT` do not form a socket address
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddress {
        /// The rejected `host:port` string
        addr: String,
        /// Parser error
        source: std::net::AddrParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Ticket handling configuration
    pub tickets: TicketsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter directive (`tracing_subscriber::EnvFilter` syntax)
    pub log_level: String,
}

/// Ticket handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketsConfig {
    /// How long a submission waits for its outcome, in milliseconds
    pub reply_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HOST` | `127.0.0.1` |
    /// | `PORT` | `8080` |
    /// | `RUST_LOG` | [`DEFAULT_LOG_FILTER`] |
    /// | `TICKET_REPLY_TIMEOUT_MS` | `5000` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            },
            tickets: TicketsConfig {
                reply_timeout_ms: lookup("TICKET_REPLY_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            },
        }
    }

    /// Address the HTTP server listens on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `host:port` does not parse.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }

    /// How long a ticket submission waits for its outcome.
    #[must_use]
    pub const fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.tickets.reply_timeout_ms)
    }
}
