//! Per-event tracking for ringdose.
//!
//! The [`EventTracker`] owns a per-event identity arena of the event's
//! primaries and the running per-ring deposits. Between
//! [`EventTracker::begin_event`] and [`ActiveEvent::finish`] it accepts
//! step callbacks in any order, either through the explicit recording
//! operations on [`ActiveEvent`] or by routing raw
//! [`StepPoint`](ringdose_core::StepPoint)s through its
//! [`StepObserver`](ringdose_core::StepObserver) impl. Finishing resolves
//! every primary's [`Fate`](ringdose_core::Fate) and yields an
//! [`EventReport`] for the [`EventObserver`]s of the run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod report;
mod router;
pub mod tolerance;
pub mod tracker;

pub use report::{BoundaryCounters, EventObserver, EventReport, PlaneTallies, PlaneTally, Tally};
pub use tolerance::TransmissionTolerance;
pub use tracker::{resolve_fate, ActiveEvent, EventTracker};
