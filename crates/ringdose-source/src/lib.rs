//! Particle source model for ringdose.
//!
//! A [`DecaySource`] turns one simulated decay into zero or more
//! [`PrimaryEmission`](ringdose_core::PrimaryEmission)s:
//!
//! - every [`GammaLine`] of the [`Spectrum`] gets an independent Bernoulli
//!   trial, so several lines can fire in the same decay and none may fire;
//! - each emitted gamma gets an independent direction drawn uniformly over
//!   solid angle inside a cone around +z ([`ConeSampler`]).
//!
//! The cone restriction biases the result; the dose normalizer corrects
//! for it using [`ConeSampler::solid_angle_fraction`].
//!
//! Sampling is deterministic given the RNG. The run driver keys a
//! `ChaCha8Rng` with the run seed and selects one stream per event.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cone;
pub mod error;
pub mod source;
pub mod spectrum;

pub use cone::ConeSampler;
pub use error::SourceError;
pub use source::{DecaySource, DecaySourceBuilder};
pub use spectrum::{GammaLine, Spectrum};
