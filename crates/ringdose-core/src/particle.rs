//! Particle species, track status, and the [`Vec3`] type.

use serde::Serialize;
use std::fmt;

/// Particle species as reported by the transport engine.
///
/// Only the species the tracking pipeline distinguishes get their own
/// variant; everything else is carried by PDG code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParticleKind {
    /// Photon (PDG 22).
    Gamma,
    /// Electron (PDG 11).
    Electron,
    /// Positron (PDG -11).
    Positron,
    /// Any other species, by PDG code.
    Other(i32),
}

impl ParticleKind {
    /// Map a PDG code onto a species.
    pub fn from_pdg(code: i32) -> Self {
        match code {
            22 => Self::Gamma,
            11 => Self::Electron,
            -11 => Self::Positron,
            other => Self::Other(other),
        }
    }

    /// The PDG code of this species.
    pub fn pdg_code(self) -> i32 {
        match self {
            Self::Gamma => 22,
            Self::Electron => 11,
            Self::Positron => -11,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gamma => write!(f, "gamma"),
            Self::Electron => write!(f, "e-"),
            Self::Positron => write!(f, "e+"),
            Self::Other(code) => write!(f, "pdg:{code}"),
        }
    }
}

/// Track status at the end of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrackStatus {
    /// The track continues.
    #[default]
    Alive,
    /// The track was stopped and killed in this step (absorbed).
    Stopped,
}

/// A 3-vector of `f64`, used for positions (mm) and directions.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct Vec3 {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
    /// z component (the beam axis).
    pub z: f64,
}

impl Vec3 {
    /// Construct from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit vector from polar angle `theta` (from +z) and azimuth `phi`.
    pub fn from_angles(theta: f64, phi: f64) -> Self {
        let sin_theta = theta.sin();
        Self {
            x: sin_theta * phi.cos(),
            y: sin_theta * phi.sin(),
            z: theta.cos(),
        }
    }

    /// Distance from the z axis.
    pub fn radial(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdg_round_trip_for_known_species() {
        for code in [22, 11, -11, 2112] {
            assert_eq!(ParticleKind::from_pdg(code).pdg_code(), code);
        }
        assert_eq!(ParticleKind::from_pdg(2112), ParticleKind::Other(2112));
    }

    #[test]
    fn from_angles_is_unit_length() {
        let v = Vec3::from_angles(0.7, 2.1);
        assert!((v.norm() - 1.0).abs() < 1e-12);
        let axis = Vec3::from_angles(0.0, 1.3);
        assert!((axis.z - 1.0).abs() < 1e-12);
        assert!(axis.radial() < 1e-12);
    }
}
