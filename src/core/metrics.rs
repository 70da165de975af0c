//! Logger metrics for observability
//!
//! Counters for monitoring the bridge: events written, events dropped by
//! failing appenders, events rejected by the level filter, messages
//! rendered, and configuration reloads.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use log_bridge::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events that at least one appender failed to write
    dropped_count: AtomicU64,

    /// Events written by every routed appender
    total_logged: AtomicU64,

    /// Calls discarded by the level filter before any formatting
    filtered_count: AtomicU64,

    /// Messages rendered (template + arguments)
    formatted_count: AtomicU64,

    /// Configuration snapshots installed
    reload_count: AtomicU64,

    /// Configuration snapshots rejected during validation
    rejected_configs: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            formatted_count: AtomicU64::new(0),
            reload_count: AtomicU64::new(0),
            rejected_configs: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn formatted_count(&self) -> u64 {
        self.formatted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reload_count(&self) -> u64 {
        self.reload_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_configs(&self) -> u64 {
        self.rejected_configs.load(Ordering::Relaxed)
    }

    /// Record a dropped event
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a successfully written event
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_formatted(&self) -> u64 {
        self.formatted_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reload(&self) -> u64 {
        self.reload_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected_config(&self) -> u64 {
        self.rejected_configs.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no events have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_logged.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.formatted_count.store(0, Ordering::Relaxed);
        self.reload_count.store(0, Ordering::Relaxed);
        self.rejected_configs.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dropped_count: AtomicU64::new(self.dropped_count()),
            total_logged: AtomicU64::new(self.total_logged()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            formatted_count: AtomicU64::new(self.formatted_count()),
            reload_count: AtomicU64::new(self.reload_count()),
            rejected_configs: AtomicU64::new(self.rejected_configs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.formatted_count(), 0);
        assert_eq!(metrics.reload_count(), 0);
    }

    #[test]
    fn test_metrics_record_dropped() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_dropped(), 0); // Returns previous value
        assert_eq!(metrics.dropped_count(), 1);
        metrics.record_dropped();
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_logged();
        }
        assert_eq!(metrics.drop_rate(), 0.0);

        // 100 logged, 10 dropped - ~9.09% drop rate
        for _ in 0..10 {
            metrics.record_dropped();
        }
        let rate = metrics.drop_rate();
        assert!(rate > 9.0 && rate < 10.0, "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();
        metrics.record_filtered();
        metrics.record_reload();

        metrics.reset();

        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.reload_count(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = LoggerMetrics::new();
        metrics.record_formatted();
        metrics.record_logged();

        let snapshot = metrics.clone();
        metrics.record_formatted();
        assert_eq!(snapshot.formatted_count(), 1);
        assert_eq!(metrics.formatted_count(), 2);
    }
}
