//! Discrete multi-line emission spectra.

use crate::error::SourceError;
use ringdose_core::LineIndex;
use serde::Serialize;

/// One spectral line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GammaLine {
    /// Photon energy, keV.
    pub energy_kev: f64,
    /// Emission probability per decay, `[0, 1]`.
    pub probability: f64,
}

/// A validated list of [`GammaLine`]s.
///
/// Lines are not mutually exclusive: probabilities may sum past 1, in
/// which case a decay emits more than one photon on average.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spectrum {
    lines: Vec<GammaLine>,
}

/// Eu-152 gamma lines as (energy keV, intensity % per decay).
const EU152_LINES: [(f64, f64); 12] = [
    (40.12, 37.7),
    (39.52, 20.8),
    (121.78, 28.5),
    (244.70, 7.6),
    (344.28, 26.5),
    (411.12, 2.2),
    (443.96, 2.8),
    (778.90, 12.9),
    (867.38, 4.2),
    (964.08, 14.6),
    (1112.07, 13.6),
    (1408.01, 21.0),
];

impl Spectrum {
    /// Build a spectrum, validating every line.
    pub fn new(lines: Vec<GammaLine>) -> Result<Self, SourceError> {
        for (i, line) in lines.iter().enumerate() {
            if !(0.0..=1.0).contains(&line.probability) {
                return Err(SourceError::ProbabilityOutOfRange {
                    line: i,
                    probability: line.probability,
                });
            }
            if !(line.energy_kev.is_finite() && line.energy_kev > 0.0) {
                return Err(SourceError::InvalidEnergy {
                    line: i,
                    energy_kev: line.energy_kev,
                });
            }
        }
        Ok(Self { lines })
    }

    /// Build from `(energy keV, intensity %)` pairs, as decay tables
    /// quote them.
    pub fn from_intensities_percent(pairs: &[(f64, f64)]) -> Result<Self, SourceError> {
        Self::new(
            pairs
                .iter()
                .map(|&(energy_kev, percent)| GammaLine {
                    energy_kev,
                    probability: percent / 100.0,
                })
                .collect(),
        )
    }

    /// The twelve principal Eu-152 gamma lines.
    pub fn eu152() -> Self {
        let lines = EU152_LINES
            .iter()
            .map(|&(energy_kev, percent)| GammaLine {
                energy_kev,
                probability: percent / 100.0,
            })
            .collect();
        Self { lines }
    }

    /// All lines, in declaration order.
    pub fn lines(&self) -> &[GammaLine] {
        &self.lines
    }

    /// Line `index`, if present.
    pub fn line(&self, index: LineIndex) -> Option<&GammaLine> {
        self.lines.get(index.as_usize())
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the spectrum has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Expected number of photons per decay, `Σ p_k`.
    pub fn mean_per_decay(&self) -> f64 {
        self.lines.iter().map(|l| l.probability).sum()
    }

    /// Variance of the photon count per decay, `Σ p_k(1 − p_k)`.
    pub fn variance_per_decay(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.probability * (1.0 - l.probability))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eu152_mean_multiplicity() {
        let s = Spectrum::eu152();
        assert_eq!(s.len(), 12);
        assert!((s.mean_per_decay() - 1.924).abs() < 1e-12);
    }

    #[test]
    fn eu152_passes_validation() {
        let rebuilt = Spectrum::from_intensities_percent(&EU152_LINES).unwrap();
        assert_eq!(rebuilt, Spectrum::eu152());
    }

    #[test]
    fn probability_above_one_rejected() {
        match Spectrum::from_intensities_percent(&[(100.0, 50.0), (200.0, 120.0)]) {
            Err(SourceError::ProbabilityOutOfRange { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected ProbabilityOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn nan_probability_rejected() {
        let lines = vec![GammaLine {
            energy_kev: 100.0,
            probability: f64::NAN,
        }];
        match Spectrum::new(lines) {
            Err(SourceError::ProbabilityOutOfRange { line: 0, .. }) => {}
            other => panic!("expected ProbabilityOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn zero_energy_rejected() {
        match Spectrum::from_intensities_percent(&[(0.0, 10.0)]) {
            Err(SourceError::InvalidEnergy { line: 0, .. }) => {}
            other => panic!("expected InvalidEnergy, got {other:?}"),
        }
    }

    #[test]
    fn certain_lines_have_zero_variance() {
        let s = Spectrum::from_intensities_percent(&[(100.0, 100.0), (200.0, 0.0)]).unwrap();
        assert_eq!(s.variance_per_decay(), 0.0);
        assert_eq!(s.mean_per_decay(), 1.0);
    }
}
