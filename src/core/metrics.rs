//! Logger metrics for observability
//!
//! Counters for records accepted into the queue, records written out by the
//! worker, and the various reasons a record never made it that far.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use fanout_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_dispatched();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records pushed onto the queue
    enqueued: AtomicU64,

    /// Records taken off the queue and fanned out
    dispatched: AtomicU64,

    /// Records dropped because their level was switched off
    level_suppressed: AtomicU64,

    /// Records dropped by the filter rules
    filter_suppressed: AtomicU64,

    /// Records submitted after the logger was closed
    rejected_after_close: AtomicU64,

    /// Sink writes that returned an error or panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            level_suppressed: AtomicU64::new(0),
            filter_suppressed: AtomicU64::new(0),
            rejected_after_close: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn level_suppressed(&self) -> u64 {
        self.level_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filter_suppressed(&self) -> u64 {
        self.filter_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_close(&self) -> u64 {
        self.rejected_after_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Records accepted but not yet dispatched
    pub fn pending(&self) -> u64 {
        self.enqueued().saturating_sub(self.dispatched())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_level_suppressed(&self) -> u64 {
        self.level_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filter_suppressed(&self) -> u64 {
        self.filter_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected_after_close(&self) -> u64 {
        self.rejected_after_close.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.dispatched.store(0, Ordering::Relaxed);
        self.level_suppressed.store(0, Ordering::Relaxed);
        self.filter_suppressed.store(0, Ordering::Relaxed);
        self.rejected_after_close.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
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
            enqueued: AtomicU64::new(self.enqueued()),
            dispatched: AtomicU64::new(self.dispatched()),
            level_suppressed: AtomicU64::new(self.level_suppressed()),
            filter_suppressed: AtomicU64::new(self.filter_suppressed()),
            rejected_after_close: AtomicU64::new(self.rejected_after_close()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}
