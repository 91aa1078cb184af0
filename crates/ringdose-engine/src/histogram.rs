//! Fixed-binning 1-D histograms and the set filled once per event.

use ringdose_tracker::EventReport;
use serde::Serialize;

/// A histogram with uniform bins over `[low, high)`.
///
/// Values below `low` go to the underflow counter, values at or above
/// `high` (and NaN) to the overflow counter. `entries` counts every fill.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram1D {
    low: f64,
    high: f64,
    bins: Vec<u64>,
    underflow: u64,
    overflow: u64,
    entries: u64,
    sum: f64,
}

impl Histogram1D {
    /// Create an empty histogram with `bins` uniform bins.
    ///
    /// At least one bin is always allocated. `high` must exceed `low`;
    /// a degenerate range sends every fill to the overflow counter.
    pub fn new(bins: usize, low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            bins: vec![0; bins.max(1)],
            underflow: 0,
            overflow: 0,
            entries: 0,
            sum: 0.0,
        }
    }

    /// Record one value.
    pub fn fill(&mut self, value: f64) {
        self.entries += 1;
        if value.is_nan() || value >= self.high {
            self.overflow += 1;
            return;
        }
        self.sum += value;
        if value < self.low {
            self.underflow += 1;
            return;
        }
        let width = (self.high - self.low) / self.bins.len() as f64;
        let idx = (((value - self.low) / width) as usize).min(self.bins.len() - 1);
        self.bins[idx] += 1;
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Content of bin `i`, or zero when out of range.
    pub fn bin(&self, i: usize) -> u64 {
        self.bins.get(i).copied().unwrap_or(0)
    }

    /// All bin contents.
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        let width = (self.high - self.low) / self.bins.len() as f64;
        self.low + (i as f64 + 0.5) * width
    }

    /// Lower edge of the binned range.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper edge of the binned range.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Fills below the range.
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    /// Fills at or above the range, plus NaN fills.
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Total number of fills.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Mean of all finite in-range and underflow values, or zero when
    /// nothing was filled.
    pub fn mean(&self) -> f64 {
        let counted = self.entries - self.overflow;
        if counted == 0 {
            0.0
        } else {
            self.sum / counted as f64
        }
    }

    /// Whether `other` has the same binning.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.low == other.low && self.high == other.high && self.bins.len() == other.bins.len()
    }

    /// Add `other` bin-wise. Histograms with a different binning are left
    /// untouched and `false` is returned.
    pub fn merge(&mut self, other: &Self) -> bool {
        if !self.same_binning(other) {
            return false;
        }
        for (mine, theirs) in self.bins.iter_mut().zip(&other.bins) {
            *mine += theirs;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.sum += other.sum;
        true
    }

    /// Empty every counter, keeping the binning.
    pub fn clear(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
        self.underflow = 0;
        self.overflow = 0;
        self.entries = 0;
        self.sum = 0.0;
    }
}

// ── Run histograms ──────────────────────────────────────────────

/// The histograms a run fills once per event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunHistograms {
    /// Primaries per event, one bin per integer 0..=14.
    pub primaries_per_event: Histogram1D,
    /// Initial energy of every generated primary, 1 keV bins to 1500 keV.
    pub generated_energy_kev: Histogram1D,
    /// Summed primary energy per event, 10 keV bins to 5000 keV.
    pub total_primary_energy_kev: Histogram1D,
    /// Per-event deposit in each ring, 1 keV bins to 200 keV. Only
    /// events with a deposit in that ring are filled.
    pub ring_deposit_kev: Vec<Histogram1D>,
    /// Per-event deposit summed over all rings, 1 keV bins to 500 keV.
    /// Only events with a deposit are filled.
    pub total_water_kev: Histogram1D,
}

impl RunHistograms {
    /// Empty histograms for `region_count` rings.
    pub fn new(region_count: usize) -> Self {
        Self {
            primaries_per_event: Histogram1D::new(15, -0.5, 14.5),
            generated_energy_kev: Histogram1D::new(1500, 0.0, 1500.0),
            total_primary_energy_kev: Histogram1D::new(500, 0.0, 5000.0),
            ring_deposit_kev: (0..region_count)
                .map(|_| Histogram1D::new(200, 0.0, 200.0))
                .collect(),
            total_water_kev: Histogram1D::new(500, 0.0, 500.0),
        }
    }

    /// Fill from one finished event.
    pub fn record(&mut self, report: &EventReport) {
        self.primaries_per_event.fill(report.primary_count() as f64);
        for primary in &report.primaries {
            self.generated_energy_kev.fill(primary.energy_kev);
        }
        self.total_primary_energy_kev
            .fill(report.total_primary_energy_kev());
        for (hist, &edep) in self
            .ring_deposit_kev
            .iter_mut()
            .zip(&report.region_deposit_kev)
        {
            if edep > 0.0 {
                hist.fill(edep);
            }
        }
        let total = report.total_deposit_kev();
        if total > 0.0 {
            self.total_water_kev.fill(total);
        }
    }

    /// Add `other` histogram by histogram.
    pub fn merge(&mut self, other: &Self) {
        self.primaries_per_event.merge(&other.primaries_per_event);
        self.generated_energy_kev.merge(&other.generated_energy_kev);
        self.total_primary_energy_kev
            .merge(&other.total_primary_energy_kev);
        for (mine, theirs) in self.ring_deposit_kev.iter_mut().zip(&other.ring_deposit_kev) {
            mine.merge(theirs);
        }
        self.total_water_kev.merge(&other.total_water_kev);
    }

    /// Empty every histogram.
    pub fn clear(&mut self) {
        self.primaries_per_event.clear();
        self.generated_energy_kev.clear();
        self.total_primary_energy_kev.clear();
        self.ring_deposit_kev.iter_mut().for_each(Histogram1D::clear);
        self.total_water_kev.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bins_centre_on_integers() {
        let mut h = Histogram1D::new(15, -0.5, 14.5);
        h.fill(0.0);
        h.fill(2.0);
        h.fill(2.0);
        assert_eq!(h.bin(0), 1);
        assert_eq!(h.bin(2), 2);
        assert_eq!(h.bin_center(2), 2.0);
        assert_eq!(h.entries(), 3);
    }

    #[test]
    fn out_of_range_goes_to_flow_counters() {
        let mut h = Histogram1D::new(10, 0.0, 10.0);
        h.fill(-1.0);
        h.fill(10.0);
        h.fill(f64::NAN);
        h.fill(9.999);
        assert_eq!(h.underflow(), 1);
        assert_eq!(h.overflow(), 2);
        assert_eq!(h.bin(9), 1);
        assert_eq!(h.entries(), 4);
    }

    #[test]
    fn merge_requires_same_binning() {
        let mut a = Histogram1D::new(10, 0.0, 10.0);
        let mut b = Histogram1D::new(10, 0.0, 10.0);
        a.fill(1.5);
        b.fill(1.5);
        b.fill(3.5);
        assert!(a.merge(&b));
        assert_eq!(a.bin(1), 2);
        assert_eq!(a.bin(3), 1);
        assert_eq!(a.entries(), 3);
        assert_eq!(a.mean(), 6.5 / 3.0);

        let c = Histogram1D::new(20, 0.0, 10.0);
        assert!(!a.merge(&c));
        assert_eq!(a.entries(), 3);
    }

    #[test]
    fn zero_bins_still_allocates_one() {
        let mut h = Histogram1D::new(0, 0.0, 1.0);
        h.fill(0.5);
        assert_eq!(h.bin_count(), 1);
        assert_eq!(h.bin(0), 1);
    }

    #[test]
    fn clear_keeps_binning() {
        let mut h = RunHistograms::new(5);
        h.primaries_per_event.fill(3.0);
        h.ring_deposit_kev[2].fill(40.0);
        h.clear();
        assert_eq!(h.primaries_per_event.entries(), 0);
        assert_eq!(h.ring_deposit_kev.len(), 5);
        assert_eq!(h.ring_deposit_kev[2].entries(), 0);
        assert_eq!(h, RunHistograms::new(5));
    }
}
