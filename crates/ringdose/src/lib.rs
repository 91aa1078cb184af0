//! Ringdose: dose bookkeeping for a filtered Eu-152 gamma source
//! irradiating a water phantom split into concentric rings.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all ringdose sub-crates. Particle transport itself is external: plug an
//! engine in through [`types::TransportEngine`] and ringdose samples the
//! primaries, tracks their fate, accumulates ring deposits and normalizes
//! them to absolute dose rates.
//!
//! # Quick start
//!
//! ```rust
//! use ringdose::prelude::*;
//!
//! // Every primary passes both planes untouched and leaves 10 keV in ring 0.
//! struct Straight;
//! impl TransportEngine for Straight {
//!     fn transport(
//!         &mut self,
//!         event: EventId,
//!         primaries: &[PrimaryEmission],
//!         observer: &mut dyn StepObserver,
//!     ) -> Result<(), TransportError> {
//!         for p in primaries {
//!             let step = |pre, post, deposit, status| StepPoint {
//!                 event,
//!                 pre_volume: pre,
//!                 post_volume: Some(post),
//!                 track: p.id,
//!                 parent: TrackId(0),
//!                 particle: ParticleKind::Gamma,
//!                 kinetic_energy_kev: p.energy_kev,
//!                 energy_deposit_kev: deposit,
//!                 position: Vec3::default(),
//!                 direction: Vec3::new(0.0, 0.0, 1.0),
//!                 status,
//!                 creator_process: None,
//!             };
//!             observer.on_step(&step("World", "UpstreamDetector", 0.0, TrackStatus::Alive));
//!             observer.on_step(&step("World", "DownstreamDetector", 0.0, TrackStatus::Alive));
//!             observer.on_step(&step("WaterRing_0Log", "WaterRing_0Log", 10.0, TrackStatus::Stopped));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let config = RunConfig::reference(200, 42);
//! let mut run = Run::new(&config, Straight).unwrap();
//! run.run();
//! let result = run.finish();
//!
//! let stats = &result.statistics;
//! assert_eq!(stats.events, 200);
//! assert_eq!(stats.transmitted, stats.total_primaries);
//! let ring0 = result.dose.region(RegionIndex(0)).unwrap();
//! assert!(ring0.dose_rate_ngy_per_h > 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ringdose-core` | IDs, units, step and primary records, core traits |
//! | [`geometry`] | `ringdose-geometry` | Ring catalog and volume-name layout |
//! | [`source`] | `ringdose-source` | Eu-152 spectrum and cone sampler |
//! | [`tracker`] | `ringdose-tracker` | Per-event fate tracking and step routing |
//! | [`engine`] | `ringdose-engine` | Accumulator, dose normalizer, run drivers |
//! | [`record`] | `ringdose-record` | CSV event records and JSON summaries |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`ringdose-core`).
///
/// Contains the step record ([`types::StepPoint`]), the primary record
/// ([`types::PrimaryEmission`]) and the collaborator traits
/// ([`types::TransportEngine`], [`types::StepObserver`],
/// [`types::DiagnosticSink`]).
pub use ringdose_core as types;

/// Ring catalog and volume layout (`ringdose-geometry`).
pub use ringdose_geometry as geometry;

/// Decay source model (`ringdose-source`).
///
/// [`source::Spectrum::eu152`] carries the tabulated lines;
/// [`source::DecaySource`] samples them into a restricted cone.
pub use ringdose_source as source;

/// Per-event tracking (`ringdose-tracker`).
pub use ringdose_tracker as tracker;

/// Run drivers, accumulation and dose normalization (`ringdose-engine`).
///
/// [`engine::Run`] for sequential runs, [`engine::BatchedRun`] to spread
/// events over worker threads.
pub use ringdose_engine as engine;

/// Result sinks (`ringdose-record`).
pub use ringdose_record as record;

/// Common imports for typical ringdose usage.
///
/// ```rust
/// use ringdose::prelude::*;
/// ```
pub mod prelude {
    // Identities and step records
    pub use ringdose_core::{
        EventId, LineIndex, ParticleKind, PrimaryEmission, RegionIndex, StepPoint, TrackId,
        TrackStatus, Vec3,
    };

    // Collaborator traits
    pub use ringdose_core::{DiagnosticSink, StepObserver, TransportEngine};

    // Errors
    pub use ringdose_core::TransportError;
    pub use ringdose_engine::ConfigError;
    pub use ringdose_record::RecordError;

    // Source and geometry
    pub use ringdose_geometry::RegionCatalog;
    pub use ringdose_source::{DecaySource, Spectrum};

    // Tracking
    pub use ringdose_tracker::{EventObserver, EventReport, TransmissionTolerance};

    // Runs and results
    pub use ringdose_engine::{
        BatchedRun, CancelToken, DoseReport, Run, RunConfig, RunResult, RunStatistics,
    };

    // Records
    pub use ringdose_record::{EventRecordWriter, PrimaryRecordWriter};
}
