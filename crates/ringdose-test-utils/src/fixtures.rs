//! Reference geometry, sources and canned step scripts.
//!
//! The scripts walk each primary through the reference volume names:
//!
//! ```text
//! World → UpstreamDetector → FilterLog → World → DownstreamDetector → WaterRing_<i>Log
//! ```

use ringdose_core::{EventId, ParticleKind, PrimaryEmission};
use ringdose_geometry::{RegionCatalog, VolumeLayout};
use ringdose_source::{DecaySource, Spectrum};

use crate::{OwnedStep, StepBuilder};

pub const REFERENCE_RINGS: u32 = 5;
pub const REFERENCE_ACTIVITY_BQ: f64 = 44_000.0;
pub const REFERENCE_CONE_DEG: f64 = 60.0;

/// Five 5 mm rings of 5 mm thick water.
pub fn reference_catalog() -> RegionCatalog {
    match RegionCatalog::new(REFERENCE_RINGS, 5.0, 5.0, 1.0) {
        Ok(catalog) => catalog,
        Err(e) => panic!("reference catalog is valid: {e}"),
    }
}

pub fn reference_layout() -> VolumeLayout {
    VolumeLayout::reference(REFERENCE_RINGS)
}

fn build_source(spectrum: Spectrum) -> DecaySource {
    match DecaySource::builder()
        .spectrum(spectrum)
        .cone_half_angle_deg(REFERENCE_CONE_DEG)
        .activity_bq(REFERENCE_ACTIVITY_BQ)
        .build()
    {
        Ok(source) => source,
        Err(e) => panic!("fixture source is valid: {e}"),
    }
}

/// Full Eu-152 source, 44 kBq, 60° cone.
pub fn eu152_source() -> DecaySource {
    build_source(Spectrum::eu152())
}

/// 122 keV and 344 keV lines with the given probabilities (0..=1).
pub fn two_line_spectrum(p122: f64, p344: f64) -> Spectrum {
    match Spectrum::from_intensities_percent(&[(122.0, p122 * 100.0), (344.0, p344 * 100.0)]) {
        Ok(spectrum) => spectrum,
        Err(e) => panic!("two-line spectrum is valid: {e}"),
    }
}

/// [`two_line_spectrum`] as a 44 kBq, 60° source.
pub fn two_line_source(p122: f64, p344: f64) -> DecaySource {
    build_source(two_line_spectrum(p122, p344))
}

/// A source whose every line has zero probability.
pub fn silent_source() -> DecaySource {
    two_line_source(0.0, 0.0)
}

/// Steps of one primary crossing both planes, losing `loss_fraction` of
/// its energy between them, entering ring `ring` and depositing
/// `deposit_kev` there before stopping.
pub fn transmitted_walk(
    primary: &PrimaryEmission,
    loss_fraction: f64,
    ring: u32,
    deposit_kev: f64,
) -> Vec<OwnedStep> {
    let id = primary.id.0;
    let e0 = primary.energy_kev;
    let e1 = e0 * (1.0 - loss_fraction);
    let ring_name = VolumeLayout::ring_name(ring);
    vec![
        StepBuilder::primary_gamma(id, e0)
            .crossing("World", "UpstreamDetector")
            .build(),
        StepBuilder::primary_gamma(id, e0)
            .crossing("UpstreamDetector", "FilterLog")
            .build(),
        StepBuilder::primary_gamma(id, e1)
            .crossing("FilterLog", "World")
            .build(),
        StepBuilder::primary_gamma(id, e1)
            .crossing("World", "DownstreamDetector")
            .build(),
        StepBuilder::primary_gamma(id, e1)
            .crossing("DownstreamDetector", &ring_name)
            .build(),
        StepBuilder::primary_gamma(id, e1)
            .within(&ring_name)
            .deposit(deposit_kev)
            .stopped()
            .build(),
    ]
}

/// Steps of one primary that crosses the upstream plane and stops in the
/// filter.
pub fn filter_absorbed_walk(primary: &PrimaryEmission) -> Vec<OwnedStep> {
    let id = primary.id.0;
    let e0 = primary.energy_kev;
    vec![
        StepBuilder::primary_gamma(id, e0)
            .crossing("World", "UpstreamDetector")
            .build(),
        StepBuilder::primary_gamma(id, e0)
            .crossing("UpstreamDetector", "FilterLog")
            .build(),
        StepBuilder::primary_gamma(id, e0)
            .within("FilterLog")
            .deposit(e0)
            .stopped()
            .build(),
    ]
}

/// A Compton electron from `parent` entering ring `ring` and depositing
/// all of `energy_kev` there.
pub fn electron_in_ring(track: u32, parent: u32, ring: u32, energy_kev: f64) -> Vec<OwnedStep> {
    let ring_name = VolumeLayout::ring_name(ring);
    vec![
        StepBuilder::particle(ParticleKind::Electron, track, parent, energy_kev)
            .crossing("World", &ring_name)
            .process("compt")
            .build(),
        StepBuilder::particle(ParticleKind::Electron, track, parent, energy_kev)
            .within(&ring_name)
            .deposit(energy_kev)
            .stopped()
            .process("compt")
            .build(),
    ]
}

/// Script: every primary is transmitted with 0.5% loss and deposits
/// `deposit_kev` in ring `(id − 1) mod 5`.
pub fn transmit_all(deposit_kev: f64) -> impl Fn(EventId, &[PrimaryEmission]) -> Vec<OwnedStep> {
    move |_, primaries| {
        primaries
            .iter()
            .flat_map(|p| transmitted_walk(p, 0.005, (p.id.0 - 1) % REFERENCE_RINGS, deposit_kev))
            .collect()
    }
}
