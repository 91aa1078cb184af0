//! Core types and traits for the ringdose dosimetry pipeline.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: identifiers,
//! units, the transport-step record, primary-emission bookkeeping, the
//! diagnostic value type, and the observer traits that sit between the
//! external transport engine and the tracking pipeline.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diagnostic;
pub mod error;
pub mod id;
pub mod particle;
pub mod primary;
pub mod step;
pub mod traits;
pub mod units;

pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticSink, NullSink};
pub use error::TransportError;
pub use id::{EventId, LineIndex, RegionIndex, TrackId};
pub use particle::{ParticleKind, TrackStatus, Vec3};
pub use primary::{
    AbsorptionSite, Boundary, EventPrimaries, Fate, PrimaryEmission, SecondaryParticle, UnresolvedReason,
};
pub use step::StepPoint;
pub use traits::{StepObserver, TransportEngine};
