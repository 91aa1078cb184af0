//! Error types for source configuration.

use std::fmt;

/// Errors from spectrum, cone or source construction.
///
/// All of these are configuration errors: generating an event never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// A line's emission probability is outside `[0, 1]` or NaN.
    ProbabilityOutOfRange {
        /// Index of the offending line.
        line: usize,
        /// The rejected probability.
        probability: f64,
    },
    /// A line's energy is not strictly positive and finite.
    InvalidEnergy {
        /// Index of the offending line.
        line: usize,
        /// The rejected energy, keV.
        energy_kev: f64,
    },
    /// The cone half-angle is outside `(0, π]` or NaN.
    InvalidConeAngle {
        /// The rejected half-angle, radians.
        half_angle_rad: f64,
    },
    /// The activity is negative or not finite.
    InvalidActivity {
        /// The rejected activity, Bq.
        activity_bq: f64,
    },
    /// The builder was not given a spectrum.
    MissingSpectrum,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbabilityOutOfRange { line, probability } => {
                write!(
                    f,
                    "line {line}: emission probability must be in [0, 1], got {probability}"
                )
            }
            Self::InvalidEnergy { line, energy_kev } => {
                write!(f, "line {line}: energy must be > 0 keV, got {energy_kev}")
            }
            Self::InvalidConeAngle { half_angle_rad } => {
                write!(
                    f,
                    "cone half-angle must be in (0, pi] rad, got {half_angle_rad}"
                )
            }
            Self::InvalidActivity { activity_bq } => {
                write!(f, "activity must be finite and >= 0 Bq, got {activity_bq}")
            }
            Self::MissingSpectrum => write!(f, "spectrum is required"),
        }
    }
}

impl std::error::Error for SourceError {}
