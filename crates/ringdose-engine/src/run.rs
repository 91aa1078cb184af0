//! The sequential run driver.
//!
//! Per event, [`Run`]:
//! 1. opens the event's ChaCha8 stream under the run seed and draws the
//!    primaries;
//! 2. opens the event on the tracker;
//! 3. hands the primaries to the transport engine, which calls back into
//!    the tracker for every step;
//! 4. finishes the event and feeds the report to the accumulator, then to
//!    every registered observer, then forwards its diagnostics.
//!
//! A transport error drops the open event before anything run-level is
//! touched. Cancellation is only checked between events.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ringdose_core::{Diagnostic, DiagnosticSink, EventId, TransportEngine, TransportError};
use ringdose_geometry::RegionCatalog;
use ringdose_source::DecaySource;
use ringdose_tracker::{EventObserver, EventTracker};
use serde::Serialize;

use crate::accumulator::{RunAccumulator, RunStatistics};
use crate::config::{ConfigError, RunConfig};
use crate::diagnostics::TracingSink;
use crate::dose::{DoseNormalizer, DoseReport};
use crate::metrics::RunMetrics;

// ── CancelToken ─────────────────────────────────────────────────

/// Shared flag asking a run to stop at the next event boundary.
///
/// Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ── RunResult ───────────────────────────────────────────────────

/// Everything a finished run hands to a results sink.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunResult {
    /// Accumulated statistics.
    pub statistics: RunStatistics,
    /// Normalized dose.
    pub dose: DoseReport,
    /// Processing metrics.
    pub metrics: RunMetrics,
}

// ── Run ─────────────────────────────────────────────────────────

/// A sequential run over events `0..config.events`.
///
/// `'o` bounds the extra observers and the diagnostic sink, so a caller
/// can lend `&mut` writers for the duration of the run and inspect them
/// after [`finish`](Run::finish).
pub struct Run<'o, T: TransportEngine> {
    source: DecaySource,
    catalog: RegionCatalog,
    tracker: EventTracker,
    accumulator: RunAccumulator,
    transport: T,
    observers: Vec<Box<dyn EventObserver + 'o>>,
    sink: Box<dyn DiagnosticSink + 'o>,
    seed: u64,
    events: u64,
    next_event: u64,
    metrics: RunMetrics,
    cancel: CancelToken,
}

impl<'o, T: TransportEngine> Run<'o, T> {
    /// Validate `config` and set up a run driving `transport`.
    ///
    /// Diagnostics go to a [`TracingSink`] with the configured limits
    /// until replaced with [`with_sink`](Self::with_sink).
    pub fn new(config: &RunConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let source = config.source.build()?;
        let catalog = config.geometry.catalog()?;
        let tracker = EventTracker::new(
            catalog.region_count(),
            source.spectrum().len(),
            config.geometry.layout(),
            config.tolerance,
        );
        let accumulator = RunAccumulator::new(catalog.region_count(), &source);
        Ok(Self {
            source,
            catalog,
            tracker,
            accumulator,
            transport,
            observers: Vec::new(),
            sink: Box::new(TracingSink::new(config.diagnostics)),
            seed: config.seed,
            events: config.events,
            next_event: 0,
            metrics: RunMetrics::default(),
            cancel: CancelToken::new(),
        })
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'o) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Share an existing cancel token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Register an observer. Observers see each report after the
    /// accumulator, in registration order.
    pub fn add_observer(&mut self, observer: impl EventObserver + 'o) {
        self.observers.push(Box::new(observer));
    }

    /// A handle that cancels this run at the next event boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The source.
    pub fn source(&self) -> &DecaySource {
        &self.source
    }

    /// The ring catalog.
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// The transport engine.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Statistics accumulated so far.
    pub fn statistics(&self) -> &RunStatistics {
        self.accumulator.statistics()
    }

    /// Metrics so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// The next event id [`step_event`](Self::step_event) will process.
    pub fn next_event(&self) -> EventId {
        EventId(self.next_event)
    }

    /// Process event `event` end to end.
    ///
    /// On a transport error the event is discarded, counted in the
    /// metrics, reported as a warning, and the error is returned. The
    /// run stays usable.
    pub fn process_event(&mut self, event: EventId) -> Result<(), TransportError> {
        let verbose = self.sink.is_verbose(event);
        let mut rng = DecaySource::event_rng(self.seed, event);
        let primaries = self.source.generate_event(&mut rng);

        let mut active = self.tracker.begin_event(event, &primaries, verbose);
        let started = Instant::now();
        let outcome = self.transport.transport(event, &primaries, &mut active);
        self.metrics.transport_us += started.elapsed().as_micros() as u64;

        if let Err(error) = outcome {
            drop(active);
            self.metrics.events_discarded += 1;
            match error {
                TransportError::Failed { .. } => self.metrics.transport_failures += 1,
                TransportError::Aborted { .. } => self.metrics.transport_aborts += 1,
            }
            self.sink.emit(&Diagnostic::EventDiscarded {
                event,
                reason: error.to_string(),
            });
            return Err(error);
        }

        let report = active.finish();
        self.accumulator.ingest(&report);
        for observer in &mut self.observers {
            observer.on_event(&report);
        }
        for diagnostic in &report.diagnostics {
            self.sink.emit(diagnostic);
        }
        self.metrics.events_accumulated += 1;
        Ok(())
    }

    /// Process the next event in sequence.
    pub fn step_event(&mut self) -> Result<EventId, TransportError> {
        let event = EventId(self.next_event);
        self.next_event += 1;
        self.process_event(event).map(|()| event)
    }

    /// Process every remaining event of the configured range, stopping
    /// early if cancelled.
    pub fn run(&mut self) -> &RunMetrics {
        let range = self.next_event..self.events;
        self.run_range(range);
        &self.metrics
    }

    /// Process events `range` in order, stopping early if cancelled.
    pub(crate) fn run_range(&mut self, range: Range<u64>) {
        let started = Instant::now();
        for e in range {
            if self.cancel.is_cancelled() {
                self.metrics.cancelled = true;
                break;
            }
            self.next_event = e + 1;
            // Discards are already counted and reported.
            let _ = self.process_event(EventId(e));
        }
        self.metrics.total_us += started.elapsed().as_micros() as u64;
    }

    /// Consume into the raw accumulator and metrics, without normalizing.
    pub(crate) fn into_parts(self) -> (RunStatistics, RunMetrics) {
        (self.accumulator.into_statistics(), self.metrics)
    }

    /// End the run: report it and normalize the statistics.
    pub fn finish(mut self) -> RunResult {
        let statistics = self.accumulator.into_statistics();
        self.sink.emit(&Diagnostic::RunFinished {
            events: statistics.events,
            primaries: statistics.total_primaries,
        });
        let dose = DoseNormalizer::finalize(&statistics, &self.catalog);
        RunResult {
            statistics,
            dose,
            metrics: self.metrics,
        }
    }
}

impl<T: TransportEngine> std::fmt::Debug for Run<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("seed", &self.seed)
            .field("events", &self.events)
            .field("next_event", &self.next_event)
            .field("observers", &self.observers.len())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringdose_test_utils::ScriptedTransport;

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn step_event_advances() {
        let config = RunConfig::reference(3, 1);
        let mut run = Run::new(&config, ScriptedTransport::silent()).unwrap();
        assert_eq!(run.step_event(), Ok(EventId(0)));
        assert_eq!(run.step_event(), Ok(EventId(1)));
        assert_eq!(run.next_event(), EventId(2));
        run.run();
        assert_eq!(run.statistics().events, 3);
        assert_eq!(run.transport().events_seen(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = RunConfig::reference(3, 1);
        config.geometry.ring_count = 0;
        match Run::new(&config, ScriptedTransport::silent()) {
            Err(ConfigError::Geometry(_)) => {}
            other => panic!("expected Geometry error, got {other:?}"),
        }
    }
}
