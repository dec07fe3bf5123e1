//! Storage metrics tracking
//!
//! Provides simple metric tracking for pool checkouts without external
//! dependencies.

use std::sync::atomic::{AtomicU64, Ordering};

/// Simple storage metrics tracker
///
/// Tracks connection pool checkouts using atomic counters for thread-safe
/// operation without locks.
#[derive(Debug)]
pub struct StorageMetrics {
    /// Number of connections successfully acquired from the pool
    pub connections_acquired: AtomicU64,

    /// Number of connections handed back to the pool
    pub connections_released: AtomicU64,

    /// Number of checkouts that gave up waiting for a free connection
    pub connections_timeout: AtomicU64,

    /// Number of connection errors
    pub connections_error: AtomicU64,

    /// Total time spent acquiring connections (in milliseconds)
    total_connection_time_ms: AtomicU64,

    /// Maximum pool size (for calculation purposes)
    max_pool_size: u32,
}

impl StorageMetrics {
    /// Create a new metrics tracker
    pub fn new(max_pool_size: u32) -> Self {
        Self {
            connections_acquired: AtomicU64::new(0),
            connections_released: AtomicU64::new(0),
            connections_timeout: AtomicU64::new(0),
            connections_error: AtomicU64::new(0),
            total_connection_time_ms: AtomicU64::new(0),
            max_pool_size,
        }
    }

    /// Record a successful connection acquisition
    pub fn record_connection_acquired(&self, duration_ms: u64) {
        self.connections_acquired.fetch_add(1, Ordering::Relaxed);
        self.total_connection_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a connection returning to the pool
    pub fn record_connection_released(&self) {
        self.connections_released.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection timeout
    pub fn record_connection_timeout(&self) {
        self.connections_timeout.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection error
    pub fn record_connection_error(&self) {
        self.connections_error.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of connections currently checked out
    pub fn checked_out(&self) -> u64 {
        let acquired = self.connections_acquired.load(Ordering::Relaxed);
        let released = self.connections_released.load(Ordering::Relaxed);
        acquired.saturating_sub(released)
    }

    /// Get average connection acquisition time in milliseconds
    pub fn avg_connection_time_ms(&self) -> u64 {
        let total = self.total_connection_time_ms.load(Ordering::Relaxed);
        let count = self.connections_acquired.load(Ordering::Relaxed);

        if count == 0 {
            0
        } else {
            total / count
        }
    }

    /// Get the maximum pool size
    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Take a point-in-time copy of the counters
    pub fn snapshot(&self) -> super::types::PoolMetrics {
        super::types::PoolMetrics {
            connections_acquired: self.connections_acquired.load(Ordering::Relaxed),
            connections_released: self.connections_released.load(Ordering::Relaxed),
            connections_timeout: self.connections_timeout.load(Ordering::Relaxed),
            connections_error: self.connections_error.load(Ordering::Relaxed),
            avg_acquisition_time_ms: self.avg_connection_time_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::metrics.
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = StorageMetrics::new(10);
        assert_eq!(metrics.max_pool_size(), 10);
        assert_eq!(metrics.connections_acquired.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.checked_out(), 0);
    }

    #[test]
    fn test_connection_acquired_and_released() {
        let metrics = StorageMetrics::new(10);
        metrics.record_connection_acquired(100);
        metrics.record_connection_acquired(200);
        assert_eq!(metrics.checked_out(), 2);
        assert_eq!(metrics.avg_connection_time_ms(), 150);

        metrics.record_connection_released();
        assert_eq!(metrics.checked_out(), 1);
    }

    #[test]
    fn test_connection_errors() {
        let metrics = StorageMetrics::new(10);
        metrics.record_connection_timeout();
        metrics.record_connection_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_timeout, 1);
        assert_eq!(snapshot.connections_error, 1);
        assert_eq!(snapshot.connections_acquired, 0);
    }

    #[test]
    fn test_avg_with_no_connections() {
        let metrics = StorageMetrics::new(10);
        assert_eq!(metrics.avg_connection_time_ms(), 0);
    }
}
