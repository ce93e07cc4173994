//! Session statistics (§7 "observability"): request/error/event counters the
//! host can poll to diagnose a misbehaving connection.
//!
//! Grounded on the teacher's `statistics.rs` (`AtomicU32` counters, an
//! `Instant` runtime clock, a `snapshot()` accessor), repurposed from SOAP
//! request counts to PDU send/receive and protocol-error counts. The engine
//! is shared between the simulator thread (outbound sends) and the network
//! thread (inbound PDUs, parse errors), so every counter is an atomic.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A point-in-time snapshot of one session's traffic counters.
///
/// ```no_run
/// use xpilot_core::statistics::StatisticsEngine;
///
/// let engine = StatisticsEngine::new();
/// let stats = engine.snapshot();
/// println!("sent {} pdus over {:?}", stats.sent_count, stats.runtime);
/// ```
#[derive(Debug)]
pub struct Statistics {
    pub runtime: Duration,
    pub sent_count: u32,
    pub received_count: u32,
    pub error_count: u32,
    /// Inbound PDUs per second over the session's lifetime so far.
    pub frequency: f32,
}

/// Shared counter set for one [`crate::session::Session`] and its
/// [`crate::connection::Connection`]. Cheap to clone (an `Arc` around plain
/// atomics) so both threads can hold a handle.
#[derive(Debug)]
pub struct StatisticsEngine {
    start_time: Instant,
    sent_count: AtomicU32,
    received_count: AtomicU32,
    error_count: AtomicU32,
}

impl StatisticsEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(StatisticsEngine {
            start_time: Instant::now(),
            sent_count: AtomicU32::new(0),
            received_count: AtomicU32::new(0),
            error_count: AtomicU32::new(0),
        })
    }

    pub fn snapshot(&self) -> Statistics {
        let runtime = self.start_time.elapsed();
        let received = self.received_count.load(Ordering::Relaxed);
        Statistics {
            runtime,
            sent_count: self.sent_count.load(Ordering::Relaxed),
            received_count: received,
            error_count: self.error_count.load(Ordering::Relaxed),
            frequency: received as f32 / runtime.as_secs_f32().max(f32::EPSILON),
        }
    }

    pub(crate) fn increment_sent(&self) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_received(&self) {
        self.received_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn new_starts_with_zero_counts() {
        let engine = StatisticsEngine::new();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.sent_count, 0);
        assert_eq!(snapshot.received_count, 0);
        assert_eq!(snapshot.error_count, 0);
    }

    #[test]
    fn increments_are_independent_per_counter() {
        let engine = StatisticsEngine::new();
        engine.increment_sent();
        engine.increment_sent();
        engine.increment_received();
        engine.increment_error();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.sent_count, 2);
        assert_eq!(snapshot.received_count, 1);
        assert_eq!(snapshot.error_count, 1);
    }

    #[test]
    fn runtime_increases_over_time() {
        let engine = StatisticsEngine::new();
        thread::sleep(Duration::from_millis(10));
        assert!(engine.snapshot().runtime >= Duration::from_millis(10));
    }

    #[test]
    fn counters_are_shared_across_clones() {
        let engine = StatisticsEngine::new();
        let clone = Arc::clone(&engine);
        clone.increment_received();
        assert_eq!(engine.snapshot().received_count, 1);
    }
}
