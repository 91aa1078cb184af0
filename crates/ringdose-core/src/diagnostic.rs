//! Diagnostics as values, and the injected sink that consumes them.
//!
//! No component logs directly. The tracker and the run driver produce
//! [`Diagnostic`] values and push them into whatever [`DiagnosticSink`]
//! the caller wired in for the run. The sink decides what to render and
//! how often.

use crate::id::{EventId, RegionIndex, TrackId};
use crate::primary::{Boundary, Fate};

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Per-step detail, only produced for verbose events.
    Debug,
    /// Per-event and per-run summaries.
    Info,
    /// Something was rejected or discarded. Never rate-limited.
    Warn,
}

/// A structured diagnostic record.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// Primaries drawn from the source for an event.
    PrimariesGenerated {
        /// Event.
        event: EventId,
        /// Initial energies, keV, in generation order.
        energies_kev: Vec<f64>,
    },
    /// Energy deposited in a ring by one step.
    RegionDeposit {
        /// Event.
        event: EventId,
        /// Ring receiving the deposit.
        region: RegionIndex,
        /// Deposited energy, keV.
        energy_kev: f64,
    },
    /// A primary crossed a recording boundary.
    PlaneCrossing {
        /// Event.
        event: EventId,
        /// Primary track.
        track: TrackId,
        /// Boundary crossed.
        boundary: Boundary,
        /// Kinetic energy at the crossing, keV.
        energy_kev: f64,
    },
    /// A deposit named a ring index outside the catalog and was dropped.
    RegionIndexRejected {
        /// Event.
        event: EventId,
        /// Offending index.
        region: RegionIndex,
        /// Number of rings in the catalog.
        region_count: usize,
    },
    /// A primary ended the event with no usable classification.
    UnresolvedFate {
        /// Event.
        event: EventId,
        /// Primary track.
        track: TrackId,
        /// The unresolved fate that was assigned.
        fate: Fate,
    },
    /// End-of-event summary.
    EventSummary {
        /// Event.
        event: EventId,
        /// Primaries generated.
        primaries: usize,
        /// Primaries classified as transmitted.
        transmitted: usize,
        /// Primaries classified as absorbed.
        absorbed: usize,
        /// Total deposit over all rings, keV.
        water_deposit_kev: f64,
    },
    /// An event was discarded without reaching the accumulator.
    EventDiscarded {
        /// Event.
        event: EventId,
        /// Why it was discarded.
        reason: String,
    },
    /// The run finished.
    RunFinished {
        /// Events accumulated.
        events: u64,
        /// Primaries generated over the run.
        primaries: u64,
    },
}

impl Diagnostic {
    /// Severity of this record.
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            Self::RegionDeposit { .. } | Self::PlaneCrossing { .. } => DiagnosticLevel::Debug,
            Self::PrimariesGenerated { .. }
            | Self::UnresolvedFate { .. }
            | Self::EventSummary { .. }
            | Self::RunFinished { .. } => DiagnosticLevel::Info,
            Self::RegionIndexRejected { .. } | Self::EventDiscarded { .. } => {
                DiagnosticLevel::Warn
            }
        }
    }

    /// Event the record belongs to, if it is event-scoped.
    pub fn event(&self) -> Option<EventId> {
        match self {
            Self::PrimariesGenerated { event, .. }
            | Self::RegionDeposit { event, .. }
            | Self::PlaneCrossing { event, .. }
            | Self::RegionIndexRejected { event, .. }
            | Self::UnresolvedFate { event, .. }
            | Self::EventSummary { event, .. }
            | Self::EventDiscarded { event, .. } => Some(*event),
            Self::RunFinished { .. } => None,
        }
    }
}

/// Consumer of [`Diagnostic`] records, scoped to one run.
pub trait DiagnosticSink: Send {
    /// Whether detail records should be produced for `event` at all.
    ///
    /// Producers skip building debug and info records for events where
    /// this returns `false`. Warnings are produced regardless.
    fn is_verbose(&self, _event: EventId) -> bool {
        true
    }

    /// Consume one record.
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Sink that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn is_verbose(&self, _event: EventId) -> bool {
        false
    }

    fn emit(&mut self, _diagnostic: &Diagnostic) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn is_verbose(&self, event: EventId) -> bool {
        (**self).is_verbose(event)
    }

    fn emit(&mut self, diagnostic: &Diagnostic) {
        (**self).emit(diagnostic);
    }
}
