//! Benchmark profiles for the ringdose engine.
//!
//! - [`reference_profile`]: Eu-152 source over the 5-ring reference phantom
//! - [`stress_profile`]: the same source over 50 rings of 1 mm
//! - [`pregenerate`]: primaries for a block of events, drawn exactly as a
//!   run would draw them

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ringdose_core::{EventId, EventPrimaries};
use ringdose_engine::{DiagnosticsConfig, GeometryConfig, RunConfig};
use ringdose_source::DecaySource;
use ringdose_tracker::TransmissionTolerance;

/// Diagnostics limits that keep benchmark output quiet.
fn quiet() -> DiagnosticsConfig {
    DiagnosticsConfig {
        verbose_events: 0,
        verbose_every: 0,
    }
}

/// Reference profile: Eu-152, 44 kBq, 60° cone, five 5 mm rings.
///
/// Identical to [`RunConfig::reference`] except that per-event
/// diagnostics are switched off.
pub fn reference_profile(events: u64, seed: u64) -> RunConfig {
    let mut config = RunConfig::reference(events, seed);
    config.diagnostics = quiet();
    config
}

/// Stress profile: 50 rings of 1 mm, 1% relative tolerance.
pub fn stress_profile(events: u64, seed: u64) -> RunConfig {
    let mut config = RunConfig::new(TransmissionTolerance::Relative(0.01), events, seed);
    config.geometry = GeometryConfig {
        ring_count: 50,
        ring_width_mm: 1.0,
        ..GeometryConfig::default()
    };
    config.diagnostics = quiet();
    config
}

/// Primaries of events `0..events` for `seed`.
pub fn pregenerate(source: &DecaySource, seed: u64, events: u64) -> Vec<EventPrimaries> {
    (0..events)
        .map(|e| {
            let mut rng = DecaySource::event_rng(seed, EventId(e));
            source.generate_event(&mut rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        reference_profile(10, 0).validate().unwrap();
        let stress = stress_profile(10, 0);
        stress.validate().unwrap();
        assert_eq!(stress.geometry.catalog().unwrap().region_count(), 50);
    }

    #[test]
    fn pregenerate_matches_event_rng() {
        let source = reference_profile(0, 0).source.build().unwrap();
        let a = pregenerate(&source, 9, 20);
        let b = pregenerate(&source, 9, 20);
        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
    }
}
