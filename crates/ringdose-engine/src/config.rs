//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is the input for constructing a [`Run`](crate::Run) or a
//! [`BatchedRun`](crate::BatchedRun). [`validate()`](RunConfig::validate)
//! builds the source and the catalog once to surface every configuration
//! error before the first event.

use std::error::Error;
use std::fmt;

use ringdose_core::Vec3;
use ringdose_geometry::{GeometryError, RegionCatalog, VolumeLayout};
use ringdose_source::{DecaySource, SourceError, Spectrum};
use ringdose_tracker::TransmissionTolerance;

// ── SourceConfig ───────────────────────────────────────────────────

/// Decay source parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// Gamma lines and their per-decay emission probabilities.
    pub spectrum: Spectrum,
    /// Half-angle of the emission cone, degrees. Default: 60.
    pub cone_half_angle_deg: f64,
    /// Isotropic source activity, Bq. Default: 44 000.
    pub activity_bq: f64,
    /// Source position, mm.
    pub position: Vec3,
}

impl SourceConfig {
    /// Build the [`DecaySource`].
    pub fn build(&self) -> Result<DecaySource, SourceError> {
        DecaySource::builder()
            .spectrum(self.spectrum.clone())
            .cone_half_angle_deg(self.cone_half_angle_deg)
            .activity_bq(self.activity_bq)
            .position(self.position)
            .build()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            spectrum: Spectrum::eu152(),
            cone_half_angle_deg: 60.0,
            activity_bq: 44_000.0,
            position: Vec3::default(),
        }
    }
}

// ── GeometryConfig ─────────────────────────────────────────────────

/// Water ring parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryConfig {
    /// Number of rings. Default: 5.
    pub ring_count: u32,
    /// Radial width of each ring, mm. Default: 5.
    pub ring_width_mm: f64,
    /// Axial water thickness, mm. Default: 5.
    pub thickness_mm: f64,
    /// Water density, g/cm³. Default: 1.
    pub density_g_cm3: f64,
}

impl GeometryConfig {
    /// Build the [`RegionCatalog`].
    pub fn catalog(&self) -> Result<RegionCatalog, GeometryError> {
        RegionCatalog::new(
            self.ring_count,
            self.ring_width_mm,
            self.thickness_mm,
            self.density_g_cm3,
        )
    }

    /// The volume-name layout matching the reference geometry.
    pub fn layout(&self) -> VolumeLayout {
        VolumeLayout::reference(self.ring_count)
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            ring_count: 5,
            ring_width_mm: 5.0,
            thickness_mm: 5.0,
            density_g_cm3: 1.0,
        }
    }
}

// ── DiagnosticsConfig ──────────────────────────────────────────────

/// Rate limiting for per-event diagnostics.
///
/// Event `e` is verbose when `e < verbose_events` or, with a non-zero
/// `verbose_every`, when `e % verbose_every == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Leading events reported in full. Default: 10.
    pub verbose_events: u64,
    /// Period of further verbose events; zero disables. Default: 10 000.
    pub verbose_every: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            verbose_events: 10,
            verbose_every: 10_000,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RunConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Region catalog construction failed.
    Geometry(GeometryError),
    /// Source construction failed.
    Source(SourceError),
    /// The transmission tolerance is negative, NaN, or a relative
    /// fraction above 1.
    InvalidTolerance {
        /// The rejected tolerance.
        tolerance: TransmissionTolerance,
    },
    /// The spectrum has no lines.
    EmptySpectrum,
    /// A batched run was asked for zero workers.
    NoWorkers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "geometry: {e}"),
            Self::Source(e) => write!(f, "source: {e}"),
            Self::InvalidTolerance { tolerance } => {
                write!(f, "invalid transmission tolerance: {tolerance}")
            }
            Self::EmptySpectrum => write!(f, "spectrum has no lines"),
            Self::NoWorkers => write!(f, "worker count must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for ConfigError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<SourceError> for ConfigError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Complete configuration of a run.
///
/// The transmission tolerance has no default and must be chosen
/// explicitly; [`RunConfig::reference`] picks `Relative(0.01)`.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Decay source.
    pub source: SourceConfig,
    /// Water rings.
    pub geometry: GeometryConfig,
    /// Rule separating transmitted from scattered primaries.
    pub tolerance: TransmissionTolerance,
    /// Simulated decays.
    pub events: u64,
    /// Base seed; event `e` draws from stream `e` of the generator keyed
    /// by this seed.
    pub seed: u64,
    /// Diagnostic rate limiting.
    pub diagnostics: DiagnosticsConfig,
    /// Worker threads for a batched run. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 64]`).
    pub worker_count: Option<usize>,
}

impl RunConfig {
    /// A run with the given tolerance and default source, geometry and
    /// diagnostics.
    pub fn new(tolerance: TransmissionTolerance, events: u64, seed: u64) -> Self {
        Self {
            source: SourceConfig::default(),
            geometry: GeometryConfig::default(),
            tolerance,
            events,
            seed,
            diagnostics: DiagnosticsConfig::default(),
            worker_count: None,
        }
    }

    /// The reference setup: Eu-152 at 44 kBq into a 60° cone, five 5 mm
    /// rings of 5 mm water, 1% relative tolerance.
    pub fn reference(events: u64, seed: u64) -> Self {
        Self::new(TransmissionTolerance::Relative(0.01), events, seed)
    }

    /// Validate every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.spectrum.is_empty() {
            return Err(ConfigError::EmptySpectrum);
        }
        if !self.tolerance.is_valid() {
            return Err(ConfigError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        self.geometry.catalog()?;
        self.source.build()?;
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// The result is clamped to `[1, 64]` and never exceeds the number of
    /// events (but is at least 1).
    pub fn resolved_worker_count(&self) -> usize {
        let wanted = match self.worker_count {
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        };
        let cap = usize::try_from(self.events).unwrap_or(usize::MAX).max(1);
        wanted.clamp(1, 64).min(cap)
    }
}
