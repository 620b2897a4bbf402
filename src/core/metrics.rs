//! Logger metrics for observability
//!
//! Counters are shared between a logger and every handle derived from it.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_logger_facade::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records emitted by at least one sink
    total_logged: AtomicU64,

    /// Individual sink writes that failed or panicked
    write_failures: AtomicU64,

    /// `sync` calls that reported at least one failing sink
    sync_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            sync_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_failures(&self) -> u64 {
        self.sync_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_failure(&self) -> u64 {
        self.sync_failures.fetch_add(1, Ordering::Relaxed)
    }
}
