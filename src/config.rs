//! Configuration Module
//!
//! Handles loading cache and store settings from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection URL for the backing store
    pub database_url: String,
    /// Table holding the cached entries
    pub table_name: String,
    /// Upper bound on pooled store connections
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CERT_CACHE_DATABASE_URL` - Store URL (default: sqlite::memory:)
    /// - `CERT_CACHE_TABLE` - Table name (default: autocert_cache)
    /// - `CERT_CACHE_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `CERT_CACHE_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("CERT_CACHE_DATABASE_URL").unwrap_or(defaults.database_url),
            table_name: env::var("CERT_CACHE_TABLE").unwrap_or(defaults.table_name),
            max_connections: env::var("CERT_CACHE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout: env::var("CERT_CACHE_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.acquire_timeout),
        }
    }

    /// Returns true when the URL points at a private in-memory SQLite database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            table_name: "autocert_cache".to_string(),
            max_connections: 5,
            acquire_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.table_name, "autocert_cache");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, 30);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the env so parallel tests do not race on it
        env::remove_var("CERT_CACHE_DATABASE_URL");
        env::remove_var("CERT_CACHE_MAX_CONNECTIONS");
        env::remove_var("CERT_CACHE_ACQUIRE_TIMEOUT_SECS");
        env::set_var("CERT_CACHE_TABLE", "certs");

        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.table_name, "certs");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, 30);

        env::set_var("CERT_CACHE_MAX_CONNECTIONS", "not-a-number");
        assert_eq!(Config::from_env().max_connections, 5);

        env::remove_var("CERT_CACHE_TABLE");
        env::remove_var("CERT_CACHE_MAX_CONNECTIONS");
    }

    #[test]
    fn test_file_url_is_not_in_memory() {
        let config = Config {
            database_url: "sqlite://certs.db?mode=rwc".to_string(),
            ..Config::default()
        };
        assert!(!config.is_in_memory());
    }
}
