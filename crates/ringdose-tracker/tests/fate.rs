//! Fate resolution does not depend on step order or on which steps the
//! engine happens to report.

use proptest::prelude::*;
use ringdose_core::{EventId, LineIndex, PrimaryEmission, RegionIndex, TrackId};
use ringdose_test_utils::fixtures::{filter_absorbed_walk, reference_layout, transmitted_walk};
use ringdose_test_utils::{replay, OwnedStep};
use ringdose_tracker::{EventReport, EventTracker, TransmissionTolerance};

fn primaries() -> Vec<PrimaryEmission> {
    vec![
        PrimaryEmission::new(TrackId(1), LineIndex(0), 122.0, 0.3, 1.0),
        PrimaryEmission::new(TrackId(2), LineIndex(1), 344.0, 0.5, 2.0),
        PrimaryEmission::new(TrackId(3), LineIndex(0), 122.0, 0.1, 3.0),
    ]
}

fn script(primaries: &[PrimaryEmission]) -> Vec<OwnedStep> {
    let mut steps = transmitted_walk(&primaries[0], 0.004, 1, 12.0);
    steps.extend(filter_absorbed_walk(&primaries[1]));
    steps.extend(transmitted_walk(&primaries[2], 0.2, 3, 7.0));
    steps
}

fn run(steps: &[OwnedStep]) -> EventReport {
    let primaries = primaries();
    let mut tracker = EventTracker::new(
        5,
        2,
        reference_layout(),
        TransmissionTolerance::Relative(0.01),
    );
    let mut event = tracker.begin_event(EventId(0), &primaries, false);
    replay(steps, &mut event);
    event.finish()
}

proptest! {
    #[test]
    fn step_order_does_not_change_the_report(
        steps in Just(script(&primaries())).prop_shuffle()
    ) {
        let ordered = run(&script(&primaries()));
        let shuffled = run(&steps);
        let fates: Vec<_> = ordered.primaries.iter().map(|p| p.fate()).collect();
        let shuffled_fates: Vec<_> = shuffled.primaries.iter().map(|p| p.fate()).collect();
        prop_assert_eq!(fates, shuffled_fates);
        prop_assert_eq!(&ordered.region_deposit_kev, &shuffled.region_deposit_kev);
        prop_assert_eq!(&ordered.line_deposit_kev, &shuffled.line_deposit_kev);
        prop_assert_eq!(ordered.counters, shuffled.counters);
        prop_assert_eq!(shuffled.region_deposit(RegionIndex(1)), 12.0);
    }

    #[test]
    fn every_primary_gets_exactly_one_fate(mask in prop::collection::vec(any::<bool>(), 15)) {
        let all = script(&primaries());
        let kept: Vec<OwnedStep> = all
            .into_iter()
            .zip(mask)
            .filter_map(|(step, keep)| keep.then_some(step))
            .collect();
        let report = run(&kept);
        prop_assert!(report.primaries.iter().all(|p| p.fate().is_some()));
        prop_assert_eq!(
            report.transmitted_count()
                + report.scattered_count()
                + report.absorbed_count()
                + report.unresolved_count(),
            report.primary_count()
        );
    }
}
