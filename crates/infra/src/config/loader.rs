//! Configuration loader
//!
//! Loads flag store configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file into the environment when one exists
//! 2. Attempts to build the configuration from environment variables
//! 3. If the required variables are missing, falls back to a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FLAGSTORE_FLAGS_DB_PATH`: Flag database file path (required)
//! - `FLAGSTORE_AUDIT_DB_PATH`: Audit database file path (required)
//! - `FLAGSTORE_FLAGS_DB_POOL_SIZE`: Flag pool size
//! - `FLAGSTORE_AUDIT_DB_POOL_SIZE`: Audit pool size
//! - `FLAGSTORE_DB_CONNECTION_TIMEOUT_MS`: Longest wait for a pooled connection
//! - `FLAGSTORE_DB_BUSY_TIMEOUT_MS`: SQLite busy timeout
//! - `FLAGSTORE_LOG_LEVEL`: Default log filter
//! - `FLAGSTORE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes `config.toml`, `flagstore.toml`, `config.json` and
//! `flagstore.json` in the working directory, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use flagstore_domain::constants::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_LOG_LEVEL, DEFAULT_POOL_SIZE,
};
use flagstore_domain::{Config, DatabaseConfig, FlagStoreError, LoggingConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.toml", "flagstore.toml", "config.json", "flagstore.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FlagStoreError::Config` if neither the environment nor any
/// config file yields a valid configuration.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Both database paths are required; everything else falls back to its
/// default.
///
/// # Errors
/// Returns `FlagStoreError::Config` if a path is missing or a numeric
/// value does not parse.
pub fn load_from_env() -> Result<Config> {
    let flags_path = env_var("FLAGSTORE_FLAGS_DB_PATH")?;
    let audit_path = env_var("FLAGSTORE_AUDIT_DB_PATH")?;

    let connection_timeout_ms =
        env_parse("FLAGSTORE_DB_CONNECTION_TIMEOUT_MS", DEFAULT_CONNECTION_TIMEOUT_MS)?;
    let busy_timeout_ms = env_parse("FLAGSTORE_DB_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS)?;

    let database = |path: String, pool_size: u32| DatabaseConfig {
        path,
        pool_size,
        connection_timeout_ms,
        busy_timeout_ms,
    };

    Ok(Config {
        flags_db: database(
            flags_path,
            env_parse("FLAGSTORE_FLAGS_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
        ),
        audit_db: database(
            audit_path,
            env_parse("FLAGSTORE_AUDIT_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
        ),
        logging: LoggingConfig {
            level: std::env::var("FLAGSTORE_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            json: env_bool("FLAGSTORE_LOG_JSON", false),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `FlagStoreError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FlagStoreError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FlagStoreError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FlagStoreError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration by file extension (`.json` or `.toml`)
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FlagStoreError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FlagStoreError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FlagStoreError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then next to the
/// executable
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FlagStoreError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, using `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| FlagStoreError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
