//! Delivery metrics for the fan-out
//!
//! Counters describing how records fared across destinations. They are the
//! only record of a lost event, since `log` never reports failures to callers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for sink observability
///
/// # Example
///
/// ```
/// use log_fanout::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
///
/// metrics.record_delivered();
/// metrics.record_lost();
///
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.lost(), 1);
/// assert_eq!(metrics.loss_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct SinkMetrics {
    /// Records written to every destination
    delivered: AtomicU64,

    /// Records written to some, but not all, destinations
    partially_delivered: AtomicU64,

    /// Records no destination accepted
    lost: AtomicU64,

    /// Individual destination write failures (errors and panics)
    destination_failures: AtomicU64,

    /// Destination writes that panicked
    destination_panics: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            partially_delivered: AtomicU64::new(0),
            lost: AtomicU64::new(0),
            destination_failures: AtomicU64::new(0),
            destination_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn partially_delivered(&self) -> u64 {
        self.partially_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lost(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn destination_failures(&self) -> u64 {
        self.destination_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn destination_panics(&self) -> u64 {
        self.destination_panics.load(Ordering::Relaxed)
    }

    /// Record a fully delivered record, returning the previous count
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_partially_delivered(&self) -> u64 {
        self.partially_delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_lost(&self) -> u64 {
        self.lost.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_destination_failure(&self) -> u64 {
        self.destination_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a panicking destination; also counts as a failure
    #[inline]
    pub fn record_destination_panic(&self) -> u64 {
        self.destination_failures.fetch_add(1, Ordering::Relaxed);
        self.destination_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of records that reached no destination, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn loss_rate(&self) -> f64 {
        let lost = self.lost() as f64;
        let total = self.delivered() as f64 + self.partially_delivered() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.partially_delivered.store(0, Ordering::Relaxed);
        self.lost.store(0, Ordering::Relaxed);
        self.destination_failures.store(0, Ordering::Relaxed);
        self.destination_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SinkMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered()),
            partially_delivered: AtomicU64::new(self.partially_delivered()),
            lost: AtomicU64::new(self.lost()),
            destination_failures: AtomicU64::new(self.destination_failures()),
            destination_panics: AtomicU64::new(self.destination_panics()),
        }
    }
}
