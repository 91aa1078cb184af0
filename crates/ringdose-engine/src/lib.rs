//! Run orchestration for ringdose.
//!
//! A [`Run`] drives events one after another through the source, the
//! external transport engine and the per-event tracker, feeding every
//! finished [`EventReport`](ringdose_tracker::EventReport) into the
//! [`RunAccumulator`] and any extra observers. At the end the
//! [`DoseNormalizer`] turns the accumulated [`RunStatistics`] into a
//! [`DoseReport`]. [`BatchedRun`] does the same over worker threads and
//! merges the partial accumulators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accumulator;
pub mod batched;
pub mod config;
pub mod diagnostics;
pub mod dose;
pub mod histogram;
pub mod metrics;
pub mod run;

pub use accumulator::{LineStatistics, RegionStatistics, RunAccumulator, RunStatistics};
pub use batched::BatchedRun;
pub use config::{ConfigError, DiagnosticsConfig, GeometryConfig, RunConfig, SourceConfig};
pub use diagnostics::TracingSink;
pub use dose::{
    irradiation_time_s, solid_angle_fraction, DoseNormalizer, DoseReport, Normalization,
    RegionDose, TotalDose, MIN_RELIABLE_COUNTS,
};
pub use histogram::{Histogram1D, RunHistograms};
pub use metrics::RunMetrics;
pub use run::{CancelToken, Run, RunResult};
