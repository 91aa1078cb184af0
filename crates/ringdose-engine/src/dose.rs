//! Conversion of accumulated deposits into calibrated dose rates.
//!
//! The source only emits into a cone covering the fraction
//! `f = (1 − cos θ)/2` of the full sphere, so `N` simulated decays stand
//! for `N / f` isotropic ones. With a source of activity `A` that many
//! decays take
//!
//! ```text
//! T = N / (f · A)   seconds
//! ```
//!
//! of real irradiation. Ring dose is deposited energy over ring mass, and
//! the dose rate is that dose over `T`. A zero `T` yields a zero rate.

use ringdose_core::units::{gray_per_second_to_nanogray_per_hour, kev_to_joule};
use ringdose_core::RegionIndex;
use ringdose_geometry::RegionCatalog;
use serde::Serialize;

use crate::accumulator::{RegionStatistics, RunStatistics};

/// Below this many events with a deposit, `1/√n` is not a trustworthy
/// relative error.
pub const MIN_RELIABLE_COUNTS: u64 = 30;

/// Fraction of 4π covered by a cone of half-angle `half_angle_rad`.
pub fn solid_angle_fraction(half_angle_rad: f64) -> f64 {
    (1.0 - half_angle_rad.cos()) / 2.0
}

/// Equivalent irradiation time `N / (f · A)` in seconds.
///
/// Zero when there are no events or when `f · A` is not a positive
/// finite number.
pub fn irradiation_time_s(events: u64, fraction: f64, activity_bq: f64) -> f64 {
    let rate = fraction * activity_bq;
    if events == 0 || !(rate.is_finite() && rate > 0.0) {
        return 0.0;
    }
    events as f64 / rate
}

fn relative_error(count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        1.0 / (count as f64).sqrt()
    }
}

fn rate(dose_gy: f64, time_s: f64) -> f64 {
    if time_s > 0.0 {
        dose_gy / time_s
    } else {
        0.0
    }
}

// ── Report types ────────────────────────────────────────────────

/// How simulated events map onto real time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Normalization {
    /// Simulated decays.
    pub simulated_events: u64,
    /// Cone half-angle, rad.
    pub cone_half_angle_rad: f64,
    /// Solid angle of the cone, sr.
    pub solid_angle_sr: f64,
    /// Fraction of 4π covered by the cone.
    pub solid_angle_fraction: f64,
    /// Isotropic decays the simulated ones stand for. Zero when the
    /// fraction is zero.
    pub equivalent_decays: f64,
    /// Source activity, Bq.
    pub activity_bq: f64,
    /// Equivalent irradiation time, s.
    pub irradiation_time_s: f64,
}

impl Normalization {
    /// Normalization for `events` decays of a source with the given cone
    /// and activity.
    pub fn new(events: u64, cone_half_angle_rad: f64, activity_bq: f64) -> Self {
        let f = solid_angle_fraction(cone_half_angle_rad);
        Self {
            simulated_events: events,
            cone_half_angle_rad,
            solid_angle_sr: 4.0 * std::f64::consts::PI * f,
            solid_angle_fraction: f,
            equivalent_decays: if f > 0.0 { events as f64 / f } else { 0.0 },
            activity_bq,
            irradiation_time_s: irradiation_time_s(events, f, activity_bq),
        }
    }

    /// Simulated time per event, ms. Zero without events.
    pub fn time_per_event_ms(&self) -> f64 {
        if self.simulated_events == 0 {
            0.0
        } else {
            self.irradiation_time_s * 1000.0 / self.simulated_events as f64
        }
    }
}

/// Dose of one ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RegionDose {
    /// Ring index.
    pub index: RegionIndex,
    /// Inner radius, mm.
    pub inner_radius_mm: f64,
    /// Outer radius, mm.
    pub outer_radius_mm: f64,
    /// Mass, kg.
    pub mass_kg: f64,
    /// Deposited energy, keV.
    pub energy_kev: f64,
    /// Events that deposited in this ring.
    pub event_count: u64,
    /// Absorbed dose, Gy.
    pub dose_gy: f64,
    /// Dose rate, Gy/s.
    pub dose_rate_gy_per_s: f64,
    /// Dose rate, nGy/h.
    pub dose_rate_ngy_per_h: f64,
    /// Counting-statistics relative error `1/√n`, zero without counts.
    pub relative_error: f64,
    /// Whether `event_count` reaches [`MIN_RELIABLE_COUNTS`].
    pub reliable: bool,
}

impl RegionDose {
    /// Absolute dose-rate uncertainty, nGy/h.
    pub fn dose_rate_error_ngy_per_h(&self) -> f64 {
        self.dose_rate_ngy_per_h * self.relative_error
    }
}

/// Mass-weighted dose over all rings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TotalDose {
    /// Summed ring mass, kg.
    pub mass_kg: f64,
    /// Summed deposit, keV.
    pub energy_kev: f64,
    /// Events that deposited anywhere in the water.
    pub event_count: u64,
    /// Mass-weighted mean dose, Gy.
    pub dose_gy: f64,
    /// Dose rate, Gy/s.
    pub dose_rate_gy_per_s: f64,
    /// Dose rate, nGy/h.
    pub dose_rate_ngy_per_h: f64,
    /// `1/√n` over the water event count.
    pub relative_error: f64,
    /// Whether `event_count` reaches [`MIN_RELIABLE_COUNTS`].
    pub reliable: bool,
}

/// The final per-run dose report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DoseReport {
    /// Event-to-time mapping.
    pub normalization: Normalization,
    /// One row per ring of the catalog.
    pub regions: Vec<RegionDose>,
    /// Mass-weighted total.
    pub total: TotalDose,
}

impl DoseReport {
    /// Row of ring `index`.
    pub fn region(&self, index: RegionIndex) -> Option<&RegionDose> {
        self.regions.get(index.as_usize())
    }
}

// ── Normalizer ──────────────────────────────────────────────────

/// Turns [`RunStatistics`] into a [`DoseReport`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DoseNormalizer;

impl DoseNormalizer {
    /// Normalize `stats` against the masses of `catalog`.
    ///
    /// One row is produced per catalog ring; a ring with no statistics
    /// entry is reported as empty.
    pub fn finalize(stats: &RunStatistics, catalog: &RegionCatalog) -> DoseReport {
        let normalization =
            Normalization::new(stats.events, stats.cone_half_angle_rad, stats.activity_bq);
        let time_s = normalization.irradiation_time_s;

        let empty = RegionStatistics::default();
        let regions: Vec<RegionDose> = catalog
            .regions()
            .iter()
            .map(|region| {
                let sums = stats.regions.get(region.index.as_usize()).unwrap_or(&empty);
                let dose_gy = kev_to_joule(sums.energy_kev) / region.mass_kg;
                let dose_rate = rate(dose_gy, time_s);
                RegionDose {
                    index: region.index,
                    inner_radius_mm: region.inner_radius_mm,
                    outer_radius_mm: region.outer_radius_mm,
                    mass_kg: region.mass_kg,
                    energy_kev: sums.energy_kev,
                    event_count: sums.event_count,
                    dose_gy,
                    dose_rate_gy_per_s: dose_rate,
                    dose_rate_ngy_per_h: gray_per_second_to_nanogray_per_hour(dose_rate),
                    relative_error: relative_error(sums.event_count),
                    reliable: sums.event_count >= MIN_RELIABLE_COUNTS,
                }
            })
            .collect();

        let mass_kg: f64 = regions.iter().map(|r| r.mass_kg).sum();
        let weighted: f64 = regions.iter().map(|r| r.dose_gy * r.mass_kg).sum();
        let dose_gy = if mass_kg > 0.0 { weighted / mass_kg } else { 0.0 };
        let dose_rate = rate(dose_gy, time_s);
        let total = TotalDose {
            mass_kg,
            energy_kev: regions.iter().map(|r| r.energy_kev).sum(),
            event_count: stats.water_event_count,
            dose_gy,
            dose_rate_gy_per_s: dose_rate,
            dose_rate_ngy_per_h: gray_per_second_to_nanogray_per_hour(dose_rate),
            relative_error: relative_error(stats.water_event_count),
            reliable: stats.water_event_count >= MIN_RELIABLE_COUNTS,
        };

        DoseReport {
            normalization,
            regions,
            total,
        }
    }
}
