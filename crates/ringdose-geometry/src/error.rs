//! Error types for geometry construction.

use std::fmt;

/// Errors arising from region catalog or layout construction.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The catalog must contain at least one ring.
    NoRegions,
    /// A dimension that must be strictly positive was not.
    NonPositiveDimension {
        /// Which dimension.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The same volume name was registered twice in a layout.
    DuplicateVolume {
        /// The duplicated name.
        name: String,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRegions => write!(f, "region catalog must have at least one ring"),
            Self::NonPositiveDimension { name, value } => {
                write!(f, "{name} must be > 0, got {value}")
            }
            Self::DuplicateVolume { name } => {
                write!(f, "volume '{name}' registered twice")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
