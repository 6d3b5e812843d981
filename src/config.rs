//! Configuration management for the booking service.
//!
//! Loads configuration from environment variables with defaults.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `PostgreSQL` configuration
    pub database: DatabaseConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_filter: String,
}

/// `PostgreSQL` configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgres://localhost/shareit".to_string()),
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),
            },
            log_filter: lookup("LOG_FILTER")
                .unwrap_or_else(|| "shareit_booking=debug,tower_http=debug".to_string()),
        }
    }
}
