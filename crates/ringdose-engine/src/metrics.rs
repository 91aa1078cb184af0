//! Run-level processing metrics.
//!
//! [`RunMetrics`] counts what happened to each event the driver touched
//! and how long transport took. Unlike [`RunStatistics`](crate::RunStatistics)
//! it also sees discarded events.

use serde::Serialize;

/// Event outcome counts and timing for a run (or one worker of a run).
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Events finished and fed to the accumulator.
    pub events_accumulated: u64,
    /// Events dropped without reaching the accumulator.
    pub events_discarded: u64,
    /// Discards caused by a transport failure.
    pub transport_failures: u64,
    /// Discards caused by the transport aborting the event.
    pub transport_aborts: u64,
    /// Whether the run stopped early on a cancel request.
    pub cancelled: bool,
    /// Time spent inside the transport engine.
    pub transport_us: u64,
    /// Wall-clock time of the event loop.
    pub total_us: u64,
}

impl RunMetrics {
    /// Events the driver attempted.
    pub fn events_attempted(&self) -> u64 {
        self.events_accumulated + self.events_discarded
    }

    /// Mean wall-clock time per attempted event, microseconds.
    pub fn mean_event_us(&self) -> f64 {
        match self.events_attempted() {
            0 => 0.0,
            n => self.total_us as f64 / n as f64,
        }
    }

    /// Add the counts of a worker's metrics.
    ///
    /// Durations are summed (CPU time across workers); `cancelled` is
    /// set if either side was cancelled.
    pub fn merge(&mut self, other: &RunMetrics) {
        self.events_accumulated += other.events_accumulated;
        self.events_discarded += other.events_discarded;
        self.transport_failures += other.transport_failures;
        self.transport_aborts += other.transport_aborts;
        self.cancelled |= other.cancelled;
        self.transport_us += other.transport_us;
        self.total_us += other.total_us;
    }
}
