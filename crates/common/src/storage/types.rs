//! Pool health and metrics value types

/// Health status of a connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub healthy: bool,

    /// Number of open connections
    pub active_connections: usize,

    /// Number of idle connections
    pub idle_connections: usize,

    /// Maximum pool size
    pub max_connections: usize,

    /// Optional error message if unhealthy
    pub message: Option<String>,
}

impl HealthStatus {
    /// Create a healthy status
    pub fn healthy(active: usize, idle: usize, max: usize) -> Self {
        Self {
            healthy: true,
            active_connections: active,
            idle_connections: idle,
            max_connections: max,
            message: None,
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(message: String) -> Self {
        Self {
            healthy: false,
            active_connections: 0,
            idle_connections: 0,
            max_connections: 0,
            message: Some(message),
        }
    }
}

/// Connection pool metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Total connections acquired
    pub connections_acquired: u64,

    /// Total connections returned to the pool
    pub connections_released: u64,

    /// Total checkout timeouts
    pub connections_timeout: u64,

    /// Total connection errors
    pub connections_error: u64,

    /// Average connection acquisition time (milliseconds)
    pub avg_acquisition_time_ms: u64,
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::types.
    use super::*;

    #[test]
    fn test_health_status_healthy() {
        let status = HealthStatus::healthy(3, 7, 10);

        assert!(status.healthy, "Status should be marked as healthy");
        assert_eq!(status.active_connections, 3);
        assert_eq!(status.idle_connections, 7);
        assert_eq!(status.max_connections, 10);
        assert!(status.message.is_none(), "Healthy status should have no error message");
    }

    #[test]
    fn test_health_status_unhealthy() {
        let status = HealthStatus::unhealthy("Pool exhausted".to_string());

        assert!(!status.healthy, "Status should be marked as unhealthy");
        assert_eq!(status.max_connections, 0, "Unhealthy status should zero out max connections");
        assert_eq!(status.message.as_deref(), Some("Pool exhausted"));
    }
}
