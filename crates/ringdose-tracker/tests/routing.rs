//! Step routing through `ActiveEvent`'s `StepObserver` impl.

use ringdose_core::{
    AbsorptionSite, Boundary, Diagnostic, EventId, Fate, LineIndex, ParticleKind,
    PrimaryEmission, RegionIndex, StepObserver, TrackId,
};
use ringdose_geometry::CountingPlane;
use ringdose_test_utils::fixtures::{
    electron_in_ring, filter_absorbed_walk, reference_layout, transmitted_walk,
};
use ringdose_test_utils::{replay, StepBuilder};
use ringdose_tracker::{EventTracker, TransmissionTolerance};

fn tracker() -> EventTracker {
    EventTracker::new(5, 2, reference_layout(), TransmissionTolerance::Relative(0.01))
}

fn primary(id: u32, line: u32, energy: f64) -> PrimaryEmission {
    PrimaryEmission::new(TrackId(id), LineIndex(line), energy, 0.2, 0.0)
}

#[test]
fn transmitted_walk_classifies_and_deposits() {
    let mut t = tracker();
    let p = primary(1, 0, 122.0);
    let mut ev = t.begin_event(EventId(0), &[p.clone()], false);
    replay(&transmitted_walk(&p, 0.005, 2, 30.0), &mut ev);
    let report = ev.finish();

    let finalized = &report.primaries[0];
    assert_eq!(finalized.fate(), Some(Fate::Transmitted));
    assert_eq!(finalized.energy_upstream(), Some(122.0));
    assert!(finalized.exited_filter());
    assert!(finalized.entered_water());
    assert_eq!(report.region_deposit(RegionIndex(2)), 30.0);
    assert_eq!(report.line_deposit(RegionIndex(2), 0), 30.0);
    assert_eq!(report.counters.filter_entries, 1);
    assert_eq!(report.counters.filter_exits, 1);
    assert_eq!(report.counters.water_entries, 1);
}

#[test]
fn filter_absorption_is_tagged() {
    let mut t = tracker();
    let p = primary(1, 1, 344.0);
    let mut ev = t.begin_event(EventId(0), &[p.clone()], false);
    replay(&filter_absorbed_walk(&p), &mut ev);
    let report = ev.finish();
    assert_eq!(
        report.primaries[0].fate(),
        Some(Fate::Absorbed {
            site: AbsorptionSite::Filter
        })
    );
    assert!(report.primaries[0].absorbed_in_filter());
    // Filter deposits are not ring deposits.
    assert_eq!(report.total_deposit_kev(), 0.0);
}

#[test]
fn electron_deposit_is_attributed_to_parent_line() {
    let mut t = tracker();
    let p = primary(1, 1, 344.0);
    let mut ev = t.begin_event(EventId(0), &[p], false);
    replay(&electron_in_ring(7, 1, 0, 12.0), &mut ev);
    let report = ev.finish();
    assert_eq!(report.region_deposit(RegionIndex(0)), 12.0);
    assert_eq!(report.line_deposit(RegionIndex(0), 1), 12.0);
    assert_eq!(report.line_deposit(RegionIndex(0), 0), 0.0);
    assert_eq!(report.counters.electron_water_entries, 1);
    assert_eq!(report.counters.water_entries, 0);
}

#[test]
fn deposit_from_unrelated_track_counts_without_line() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[primary(1, 0, 122.0)], false);
    let step = StepBuilder::particle(ParticleKind::Electron, 20, 9, 5.0)
        .within("WaterRing_1Log")
        .deposit(5.0)
        .build();
    ev.on_step(&step.as_step());
    let report = ev.finish();
    assert_eq!(report.region_deposit(RegionIndex(1)), 5.0);
    assert_eq!(report.line_deposit_kev.iter().sum::<f64>(), 0.0);
}

#[test]
fn unknown_ring_name_is_rejected_with_warning() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(4), &[], false);
    let step = StepBuilder::primary_gamma(1, 50.0)
        .within("WaterRing_7Log")
        .deposit(10.0)
        .build();
    ev.on_step(&step.as_step());
    let report = ev.finish();
    assert_eq!(report.rejected_deposits, 1);
    assert_eq!(report.total_deposit_kev(), 0.0);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [Diagnostic::RegionIndexRejected {
            region: RegionIndex(7),
            ..
        }]
    ));
}

#[test]
fn backward_plane_crossing_is_ignored() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[primary(1, 0, 122.0)], false);
    let step = StepBuilder::primary_gamma(1, 122.0)
        .crossing("World", "UpstreamDetector")
        .backward()
        .build();
    ev.on_step(&step.as_step());
    assert!(!ev.primary(TrackId(1)).unwrap().detected_upstream());
}

#[test]
fn secondary_at_downstream_plane_is_recorded() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[primary(1, 0, 122.0)], false);
    let with_process = StepBuilder::particle(ParticleKind::Electron, 5, 1, 40.0)
        .crossing("World", "DownstreamDetector")
        .process("phot")
        .build();
    let without_process = StepBuilder::particle(ParticleKind::Gamma, 6, 5, 8.0)
        .crossing("World", "DownstreamDetector")
        .build();
    let upstream_secondary = StepBuilder::particle(ParticleKind::Electron, 8, 1, 3.0)
        .crossing("World", "UpstreamDetector")
        .build();
    ev.on_step(&with_process.as_step());
    ev.on_step(&without_process.as_step());
    ev.on_step(&upstream_secondary.as_step());
    let report = ev.finish();
    assert_eq!(report.secondaries.len(), 2);
    assert_eq!(report.secondaries[0].process, "phot");
    assert_eq!(report.secondaries[0].parent, TrackId(1));
    assert_eq!(report.secondaries[1].process, "unknown");
    assert_eq!(report.secondaries[1].particle, ParticleKind::Gamma);
}

#[test]
fn counting_planes_split_by_direction() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[], false);
    for step in [
        StepBuilder::primary_gamma(1, 100.0)
            .crossing("World", "PreWaterPlaneLog")
            .build(),
        StepBuilder::particle(ParticleKind::Gamma, 3, 1, 60.0)
            .crossing("World", "PreWaterPlaneLog")
            .backward()
            .build(),
        StepBuilder::particle(ParticleKind::Electron, 4, 1, 10.0)
            .crossing("World", "PreWaterPlaneLog")
            .build(),
        // Staying inside the plane is not a crossing.
        StepBuilder::primary_gamma(1, 100.0)
            .within("PreWaterPlaneLog")
            .build(),
    ] {
        ev.on_step(&step.as_step());
    }
    let report = ev.finish();
    let tally = report.planes.get(CountingPlane::PreWater);
    assert_eq!(tally.photon_forward.count, 1);
    assert_eq!(tally.photon_backward.count, 1);
    assert_eq!(tally.photon_backward.energy_kev, 60.0);
    assert_eq!(tally.electron_forward.count, 1);
    assert_eq!(report.planes.get(CountingPlane::PostWater).photon_forward.count, 0);
}

#[test]
fn recrossing_keeps_latest_energy() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[primary(1, 0, 122.0)], false);
    for energy in [122.0, 110.0] {
        let step = StepBuilder::primary_gamma(1, energy)
            .crossing("World", "DownstreamDetector")
            .build();
        ev.on_step(&step.as_step());
    }
    assert_eq!(
        ev.primary(TrackId(1))
            .and_then(|p| p.crossing(Boundary::DownstreamPlane)),
        Some(110.0)
    );
}

#[test]
fn container_entry_counts_wall_and_lid_once_each() {
    let mut t = tracker();
    let mut ev = t.begin_event(EventId(0), &[primary(1, 0, 122.0)], false);
    for step in [
        StepBuilder::primary_gamma(1, 122.0)
            .crossing("World", "ContainerTopLog")
            .build(),
        StepBuilder::primary_gamma(1, 122.0)
            .crossing("ContainerTopLog", "ContainerWallLog")
            .build(),
        StepBuilder::primary_gamma(1, 122.0)
            .crossing("World", "ContainerWallLog")
            .build(),
    ] {
        ev.on_step(&step.as_step());
    }
    let report = ev.finish();
    assert_eq!(report.counters.container_entries, 2);
}
