//! Direction sampling restricted to a cone around +z.

use crate::error::SourceError;
use rand::Rng;
use ringdose_core::Vec3;
use std::f64::consts::{PI, TAU};

/// Samples directions uniformly over solid angle inside a cone of fixed
/// half-angle around +z.
///
/// `cos θ` is uniform on `[cos θ_c, 1]` and `φ` uniform on `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeSampler {
    half_angle_rad: f64,
    cos_half_angle: f64,
}

impl ConeSampler {
    /// Cone of the given half-angle, radians. Must be in `(0, π]`.
    pub fn new(half_angle_rad: f64) -> Result<Self, SourceError> {
        if !(half_angle_rad.is_finite() && half_angle_rad > 0.0 && half_angle_rad <= PI) {
            return Err(SourceError::InvalidConeAngle { half_angle_rad });
        }
        Ok(Self {
            half_angle_rad,
            cos_half_angle: half_angle_rad.cos(),
        })
    }

    /// Cone of the given half-angle, degrees.
    pub fn from_degrees(half_angle_deg: f64) -> Result<Self, SourceError> {
        Self::new(half_angle_deg.to_radians())
    }

    /// The isotropic case (`θ_c = π`).
    pub fn isotropic() -> Self {
        Self {
            half_angle_rad: PI,
            cos_half_angle: -1.0,
        }
    }

    /// Half-angle, radians.
    pub fn half_angle_rad(&self) -> f64 {
        self.half_angle_rad
    }

    /// Fraction of 4π covered by the cone: `(1 − cos θ_c) / 2`.
    pub fn solid_angle_fraction(&self) -> f64 {
        (1.0 - self.cos_half_angle) / 2.0
    }

    /// Draw `(θ, φ, direction)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64, Vec3) {
        let u: f64 = rng.random();
        let cos_theta = 1.0 - u * (1.0 - self.cos_half_angle);
        let theta = cos_theta.clamp(-1.0, 1.0).acos();
        let phi = rng.random::<f64>() * TAU;
        (theta, phi, Vec3::from_angles(theta, phi))
    }
}
