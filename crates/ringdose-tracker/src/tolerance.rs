//! Transmission tolerance: how much energy a primary may lose between the
//! upstream and downstream planes and still count as transmitted.

use serde::Serialize;
use std::fmt;

/// Acceptance rule comparing upstream and downstream plane energies.
///
/// There is no default: a run must choose one explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum TransmissionTolerance {
    /// Transmitted iff `E_down / E_up > 1 − f`.
    Relative(f64),
    /// Transmitted iff `|E_up − E_down| < e` (keV).
    AbsoluteKev(f64),
}

impl TransmissionTolerance {
    /// Whether the pair of plane energies counts as a transmission.
    ///
    /// A zero or negative upstream energy never transmits under
    /// [`Relative`](Self::Relative).
    pub fn accepts(&self, upstream_kev: f64, downstream_kev: f64) -> bool {
        match *self {
            Self::Relative(fraction) => {
                upstream_kev > 0.0 && downstream_kev / upstream_kev > 1.0 - fraction
            }
            Self::AbsoluteKev(window) => (upstream_kev - downstream_kev).abs() < window,
        }
    }

    /// Whether the parameter is usable: finite, `Relative` in `[0, 1]`,
    /// `AbsoluteKev` `>= 0`.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Relative(f) => f.is_finite() && (0.0..=1.0).contains(&f),
            Self::AbsoluteKev(e) => e.is_finite() && e >= 0.0,
        }
    }
}

impl fmt::Display for TransmissionTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative(fraction) => write!(f, "relative {fraction}"),
            Self::AbsoluteKev(window) => write!(f, "absolute {window} keV"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_one_percent() {
        let tol = TransmissionTolerance::Relative(0.01);
        assert!(tol.accepts(100.0, 99.5));
        assert!(!tol.accepts(100.0, 98.0));
        assert!(tol.accepts(122.0, 121.0));
        assert!(!tol.accepts(0.0, 0.0));
    }

    #[test]
    fn absolute_window() {
        let tol = TransmissionTolerance::AbsoluteKev(1.0);
        assert!(tol.accepts(100.0, 99.5));
        assert!(!tol.accepts(100.0, 98.0));
        assert!(!tol.accepts(100.0, 99.0));
    }

    #[test]
    fn validity() {
        assert!(TransmissionTolerance::Relative(0.01).is_valid());
        assert!(!TransmissionTolerance::Relative(1.5).is_valid());
        assert!(!TransmissionTolerance::Relative(f64::NAN).is_valid());
        assert!(TransmissionTolerance::AbsoluteKev(0.0).is_valid());
        assert!(!TransmissionTolerance::AbsoluteKev(-1.0).is_valid());
    }
}
