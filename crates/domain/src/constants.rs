//! Domain constants

/// Timeline colour stored on every toggle audit record
pub const AUDIT_COLOR: &str = "blue";

/// Timeline dot marker stored on every toggle audit record
pub const AUDIT_DOT: &str = "";

// Storage defaults
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
