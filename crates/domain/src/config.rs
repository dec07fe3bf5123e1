//! Configuration types for the flag store

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_LOG_LEVEL, DEFAULT_POOL_SIZE,
};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Flag table database and its pool
    pub flags_db: DatabaseConfig,
    /// Audit table database and its pool, sized independently
    pub audit_db: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database and pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Longest a checkout waits before failing with pool exhaustion
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Create a database config for `path` with default pool settings
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_connection_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connection_timeout_ms = timeout_ms;
        self
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flags_db: DatabaseConfig::new("flagstore.db"),
            audit_db: DatabaseConfig::new("flagstore_audit.db"),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_connection_timeout_ms() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_MS
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"flags_db": {"path": "f.db"}, "audit_db": {"path": "a.db", "pool_size": 2}}"#,
        )
        .unwrap();

        assert_eq!(config.flags_db.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.audit_db.pool_size, 2);
        assert_eq!(config.audit_db.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn default_uses_separate_databases() {
        let config = Config::default();
        assert_ne!(config.flags_db.path, config.audit_db.path);
    }
}
