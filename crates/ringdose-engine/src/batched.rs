//! Parallel runs over disjoint event ranges.
//!
//! [`BatchedRun`] splits `0..events` into one contiguous range per worker.
//! Each worker owns a full [`Run`] (tracker, accumulator, transport
//! clone) and sends its partial statistics back over a channel. The
//! partials are merged in range order. Since every event's RNG depends
//! only on the run seed and the event id, the workers generate exactly
//! the events a sequential run would.

use std::ops::Range;

use ringdose_core::TransportEngine;

use crate::accumulator::RunStatistics;
use crate::config::{ConfigError, RunConfig};
use crate::dose::DoseNormalizer;
use crate::metrics::RunMetrics;
use crate::run::{CancelToken, Run, RunResult};

/// A run spread over worker threads.
#[derive(Debug)]
pub struct BatchedRun<T> {
    config: RunConfig,
    transport: T,
    workers: usize,
    cancel: CancelToken,
}

/// Split `0..events` into `workers` contiguous ranges whose lengths
/// differ by at most one.
fn partition(events: u64, workers: usize) -> Vec<Range<u64>> {
    let n = workers.max(1) as u64;
    let base = events / n;
    let extra = events % n;
    let mut start = 0;
    (0..n)
        .map(|i| {
            let len = base + u64::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

impl<T: TransportEngine + Clone> BatchedRun<T> {
    /// Validate `config` and prepare a batched run. Each worker gets its
    /// own clone of `transport`.
    pub fn new(config: RunConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = config.resolved_worker_count();
        Ok(Self {
            config,
            transport,
            workers,
            cancel: CancelToken::new(),
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// A handle that stops every worker at its next event boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run all workers to completion and merge their results.
    pub fn run(self) -> Result<RunResult, ConfigError> {
        let catalog = self.config.geometry.catalog()?;
        let ranges = partition(self.config.events, self.workers);
        let (tx, rx) = crossbeam_channel::unbounded();

        std::thread::scope(|scope| {
            for (index, range) in ranges.into_iter().enumerate() {
                let tx = tx.clone();
                let transport = self.transport.clone();
                let config = &self.config;
                let cancel = self.cancel.clone();
                scope.spawn(move || {
                    let partial = Run::new(config, transport).map(|run| {
                        let mut run = run.with_cancel_token(cancel);
                        run.run_range(range);
                        run.into_parts()
                    });
                    // The receiver outlives the scope.
                    let _ = tx.send((index, partial));
                });
            }
        });
        drop(tx);

        let mut partials: Vec<(usize, Result<(RunStatistics, RunMetrics), ConfigError>)> =
            rx.iter().collect();
        partials.sort_by_key(|(index, _)| *index);

        let mut merged: Option<(RunStatistics, RunMetrics)> = None;
        for (_, partial) in partials {
            let (stats, metrics) = partial?;
            match merged.as_mut() {
                Some((all_stats, all_metrics)) => {
                    all_stats.merge(&stats);
                    all_metrics.merge(&metrics);
                }
                None => merged = Some((stats, metrics)),
            }
        }

        let (statistics, metrics) = match merged {
            Some(parts) => parts,
            None => {
                let source = self.config.source.build()?;
                (
                    RunStatistics::new(catalog.region_count(), &source),
                    RunMetrics::default(),
                )
            }
        };
        let dose = DoseNormalizer::finalize(&statistics, &catalog);
        Ok(RunResult {
            statistics,
            dose,
            metrics,
        })
    }
}
