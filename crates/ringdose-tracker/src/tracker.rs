//! The per-event tracker and its `ActiveEvent` guard.
//!
//! Lifecycle per event:
//! 1. [`EventTracker::begin_event`] clears every per-event buffer and
//!    registers the event's primaries in a fresh identity arena. It
//!    returns an [`ActiveEvent`] guard (the Collecting state).
//! 2. Step callbacks arrive through the guard, either via the recording
//!    methods or via its [`StepObserver`](ringdose_core::StepObserver)
//!    impl (see `router.rs`).
//! 3. [`ActiveEvent::finish`] resolves every primary's fate and moves the
//!    event's data out into an [`EventReport`].
//!
//! Dropping the guard without calling `finish` discards the event. The
//! tracker holds no run-level state, so nothing leaks into the next event.

use crate::report::{BoundaryCounters, EventReport, PlaneTallies};
use crate::tolerance::TransmissionTolerance;
use indexmap::IndexMap;
use ringdose_core::{
    AbsorptionSite, Boundary, Diagnostic, EventId, EventPrimaries, Fate, LineIndex,
    PrimaryEmission, RegionIndex, SecondaryParticle, TrackId, UnresolvedReason,
};
use ringdose_geometry::VolumeLayout;

/// Per-event bookkeeping for primaries, ring deposits and crossings.
///
/// One tracker is reused across all events of a run (or of one worker in a
/// batched run). Buffers keep their capacity between events.
#[derive(Debug)]
pub struct EventTracker {
    pub(crate) layout: VolumeLayout,
    region_count: usize,
    line_count: usize,
    tolerance: TransmissionTolerance,

    // ── per-event state, reset by begin_event ──────────────────
    pub(crate) event: EventId,
    pub(crate) verbose: bool,
    pub(crate) primaries: IndexMap<TrackId, PrimaryEmission>,
    region_deposit_kev: Vec<f64>,
    line_deposit_kev: Vec<f64>,
    pub(crate) secondaries: Vec<SecondaryParticle>,
    pub(crate) planes: PlaneTallies,
    pub(crate) counters: BoundaryCounters,
    rejected_deposits: u64,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl EventTracker {
    /// Create a tracker for `region_count` rings and `line_count` spectrum
    /// lines.
    pub fn new(
        region_count: usize,
        line_count: usize,
        layout: VolumeLayout,
        tolerance: TransmissionTolerance,
    ) -> Self {
        Self {
            layout,
            region_count,
            line_count,
            tolerance,
            event: EventId(0),
            verbose: false,
            primaries: IndexMap::new(),
            region_deposit_kev: vec![0.0; region_count],
            line_deposit_kev: vec![0.0; region_count * line_count],
            secondaries: Vec::new(),
            planes: PlaneTallies::default(),
            counters: BoundaryCounters::default(),
            rejected_deposits: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Number of rings deposits are accepted for.
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Number of spectrum lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// The configured transmission tolerance.
    pub fn tolerance(&self) -> TransmissionTolerance {
        self.tolerance
    }

    /// The volume layout used to route steps.
    pub fn layout(&self) -> &VolumeLayout {
        &self.layout
    }

    /// Start collecting `event`.
    ///
    /// Clears all per-event state and registers `primaries` under their
    /// own identities. When `verbose` is set, debug and info diagnostics
    /// are buffered for the event; warnings are always buffered.
    ///
    /// Primary track ids must be unique within the event; duplicates would
    /// collapse into one entry and undercount the primaries. Checked in
    /// debug builds.
    pub fn begin_event(
        &mut self,
        event: EventId,
        primaries: &[PrimaryEmission],
        verbose: bool,
    ) -> ActiveEvent<'_> {
        self.event = event;
        self.verbose = verbose;
        self.primaries.clear();
        self.primaries
            .extend(primaries.iter().map(|p| (p.id, p.clone())));
        debug_assert_eq!(
            self.primaries.len(),
            primaries.len(),
            "duplicate primary TrackId in event {event}"
        );
        self.region_deposit_kev.clear();
        self.region_deposit_kev.resize(self.region_count, 0.0);
        self.line_deposit_kev.clear();
        self.line_deposit_kev
            .resize(self.region_count * self.line_count, 0.0);
        self.secondaries.clear();
        self.planes = PlaneTallies::default();
        self.counters = BoundaryCounters::default();
        self.rejected_deposits = 0;
        self.diagnostics.clear();

        if verbose {
            self.diagnostics.push(Diagnostic::PrimariesGenerated {
                event,
                energies_kev: primaries.iter().map(|p| p.energy_kev).collect(),
            });
        }

        ActiveEvent { tracker: self }
    }
}

/// The Collecting state of one event.
///
/// Every recording method is keyed by identity and tolerant of unknown
/// identities: a call for a track that is not one of this event's
/// primaries changes nothing and is not an error.
#[must_use = "an ActiveEvent discards its event unless finish() is called"]
#[derive(Debug)]
pub struct ActiveEvent<'a> {
    pub(crate) tracker: &'a mut EventTracker,
}

impl ActiveEvent<'_> {
    /// The event being collected.
    pub fn event(&self) -> EventId {
        self.tracker.event
    }

    /// Whether `track` is one of this event's primaries.
    pub fn is_primary(&self, track: TrackId) -> bool {
        self.tracker.primaries.contains_key(&track)
    }

    /// Current state of primary `track`.
    pub fn primary(&self, track: TrackId) -> Option<&PrimaryEmission> {
        self.tracker.primaries.get(&track)
    }

    /// Number of registered primaries.
    pub fn primary_count(&self) -> usize {
        self.tracker.primaries.len()
    }

    /// Running deposit in `region` for this event, keV.
    pub fn region_deposit(&self, region: RegionIndex) -> Option<f64> {
        self.tracker
            .region_deposit_kev
            .get(region.as_usize())
            .copied()
    }

    /// Record that primary `track` crossed `boundary` with `energy_kev`.
    ///
    /// A repeated crossing of the same boundary overwrites the earlier
    /// energy. Returns `false` (and does nothing) for unknown tracks.
    pub fn record_boundary_crossing(
        &mut self,
        track: TrackId,
        boundary: Boundary,
        energy_kev: f64,
    ) -> bool {
        let t = &mut *self.tracker;
        let Some(primary) = t.primaries.get_mut(&track) else {
            return false;
        };
        primary.record_crossing(boundary, energy_kev);
        if t.verbose {
            t.diagnostics.push(Diagnostic::PlaneCrossing {
                event: t.event,
                track,
                boundary,
                energy_kev,
            });
        }
        true
    }

    /// Add `energy_kev` to the running deposit of `region`.
    ///
    /// An out-of-range index is rejected: nothing is added, the rejection
    /// is counted and a warning is buffered. Returns whether the deposit
    /// was accepted.
    pub fn record_region_deposit(&mut self, region: RegionIndex, energy_kev: f64) -> bool {
        let t = &mut *self.tracker;
        let Some(slot) = t.region_deposit_kev.get_mut(region.as_usize()) else {
            t.rejected_deposits += 1;
            t.diagnostics.push(Diagnostic::RegionIndexRejected {
                event: t.event,
                region,
                region_count: t.region_count,
            });
            return false;
        };
        *slot += energy_kev;
        if t.verbose {
            t.diagnostics.push(Diagnostic::RegionDeposit {
                event: t.event,
                region,
                energy_kev,
            });
        }
        true
    }

    /// Attribute `energy_kev` in `region` to spectrum line `line`.
    ///
    /// Out-of-range indices are ignored; the ring total is tracked
    /// separately by [`record_region_deposit`](Self::record_region_deposit).
    pub fn record_line_deposit(&mut self, region: RegionIndex, line: LineIndex, energy_kev: f64) {
        let t = &mut *self.tracker;
        if region.as_usize() >= t.region_count || line.as_usize() >= t.line_count {
            return;
        }
        t.line_deposit_kev[region.as_usize() * t.line_count + line.as_usize()] += energy_kev;
    }

    /// Tag primary `track` as absorbed at `site`.
    ///
    /// Only consulted when the downstream plane is never observed.
    /// Returns `false` for unknown tracks.
    pub fn record_absorption(&mut self, track: TrackId, site: AbsorptionSite) -> bool {
        match self.tracker.primaries.get_mut(&track) {
            Some(primary) => {
                primary.record_absorption(site);
                true
            }
            None => false,
        }
    }

    /// Append a secondary seen at the downstream plane.
    pub fn record_secondary(&mut self, secondary: SecondaryParticle) {
        self.tracker.secondaries.push(secondary);
    }

    /// Resolve every primary's fate and produce the event report.
    ///
    /// Consumes the guard; the tracker is ready for the next
    /// [`begin_event`](EventTracker::begin_event).
    pub fn finish(self) -> EventReport {
        let t = self.tracker;
        let event = t.event;
        let tolerance = t.tolerance;

        let mut primaries = EventPrimaries::with_capacity(t.primaries.len());
        for (_, mut primary) in t.primaries.drain(..) {
            let fate = resolve_fate(&primary, tolerance);
            primary.finalize(fate);
            // Counted by the accumulator either way; the record is detail.
            if t.verbose
                && matches!(
                    fate,
                    Fate::Unresolved(_)
                        | Fate::Absorbed {
                            site: AbsorptionSite::Unresolved
                        }
                )
            {
                t.diagnostics.push(Diagnostic::UnresolvedFate {
                    event,
                    track: primary.id,
                    fate,
                });
            }
            primaries.push(primary);
        }

        let region_deposit_kev = std::mem::replace(
            &mut t.region_deposit_kev,
            Vec::with_capacity(t.region_count),
        );
        let line_deposit_kev = std::mem::replace(
            &mut t.line_deposit_kev,
            Vec::with_capacity(t.region_count * t.line_count),
        );

        let mut report = EventReport {
            event,
            primaries,
            region_deposit_kev,
            line_deposit_kev,
            line_count: t.line_count,
            secondaries: std::mem::take(&mut t.secondaries),
            planes: t.planes,
            counters: t.counters,
            rejected_deposits: t.rejected_deposits,
            diagnostics: Vec::new(),
        };

        if t.verbose {
            t.diagnostics.push(Diagnostic::EventSummary {
                event,
                primaries: report.primary_count(),
                transmitted: report.transmitted_count(),
                absorbed: report.absorbed_count(),
                water_deposit_kev: report.total_deposit_kev(),
            });
        }
        report.diagnostics = std::mem::take(&mut t.diagnostics);
        report
    }
}

/// Fate resolution, in priority order:
///
/// 1. both planes seen: transmitted if `tolerance` accepts, else scattered;
/// 2. downstream never seen: absorbed, at the explicit tag if any, else
///    filter if the filter was never exited, else water if the water was
///    entered, else an unresolved site;
/// 3. downstream seen without upstream: unresolved.
pub fn resolve_fate(primary: &PrimaryEmission, tolerance: TransmissionTolerance) -> Fate {
    match (primary.energy_upstream(), primary.energy_downstream()) {
        (Some(up), Some(down)) => {
            if tolerance.accepts(up, down) {
                Fate::Transmitted
            } else {
                Fate::Scattered
            }
        }
        (_, None) => {
            let site = primary.absorption_tag().unwrap_or(if !primary.exited_filter() {
                AbsorptionSite::Filter
            } else if primary.entered_water() {
                AbsorptionSite::Water
            } else {
                AbsorptionSite::Unresolved
            });
            Fate::Absorbed { site }
        }
        (None, Some(_)) => Fate::Unresolved(UnresolvedReason::MissedUpstream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringdose_core::DiagnosticLevel;

    const TOL: TransmissionTolerance = TransmissionTolerance::Relative(0.01);

    fn primary(id: u32, energy: f64) -> PrimaryEmission {
        PrimaryEmission::new(TrackId(id), LineIndex(0), energy, 0.1, 0.2)
    }

    fn tracker() -> EventTracker {
        EventTracker::new(5, 2, VolumeLayout::reference(5), TOL)
    }

    #[test]
    fn transmitted_within_one_percent() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(0), &[primary(1, 100.0)], false);
        ev.record_boundary_crossing(TrackId(1), Boundary::UpstreamPlane, 100.0);
        ev.record_boundary_crossing(TrackId(1), Boundary::DownstreamPlane, 99.5);
        let report = ev.finish();
        assert!(report.primaries[0].transmitted());
        assert_eq!(report.transmitted_count(), 1);
    }

    #[test]
    fn two_percent_loss_is_scattered() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(0), &[primary(1, 100.0)], false);
        ev.record_boundary_crossing(TrackId(1), Boundary::UpstreamPlane, 100.0);
        ev.record_boundary_crossing(TrackId(1), Boundary::DownstreamPlane, 98.0);
        let report = ev.finish();
        assert!(!report.primaries[0].transmitted());
        assert_eq!(report.primaries[0].fate(), Some(Fate::Scattered));
        assert_eq!(report.scattered_count(), 1);
    }

    #[test]
    fn unknown_identity_is_a_no_op() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(0), &[primary(1, 100.0)], true);
        let before = ev.primary(TrackId(1)).cloned();
        assert!(!ev.record_boundary_crossing(TrackId(42), Boundary::UpstreamPlane, 5.0));
        assert!(!ev.record_absorption(TrackId(42), AbsorptionSite::Water));
        assert_eq!(ev.primary(TrackId(1)).cloned(), before);
        assert_eq!(ev.primary_count(), 1);
        let report = ev.finish();
        assert!(!report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::PlaneCrossing { .. })));
    }

    #[test]
    fn out_of_range_deposit_rejected_with_warning() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(3), &[], false);
        assert!(!ev.record_region_deposit(RegionIndex(5), 10.0));
        assert!(ev.record_region_deposit(RegionIndex(4), 10.0));
        let report = ev.finish();
        assert_eq!(report.rejected_deposits, 1);
        assert_eq!(report.total_deposit_kev(), 10.0);
        let warnings: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.level() == DiagnosticLevel::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        match warnings[0] {
            Diagnostic::RegionIndexRejected {
                event,
                region,
                region_count,
            } => {
                assert_eq!(*event, EventId(3));
                assert_eq!(*region, RegionIndex(5));
                assert_eq!(*region_count, 5);
            }
            other => panic!("expected RegionIndexRejected, got {other:?}"),
        }
    }

    #[test]
    fn deposits_accumulate() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(0), &[], false);
        ev.record_region_deposit(RegionIndex(2), 1.5);
        ev.record_region_deposit(RegionIndex(2), 2.5);
        assert_eq!(ev.region_deposit(RegionIndex(2)), Some(4.0));
        let report = ev.finish();
        assert_eq!(report.region_deposit(RegionIndex(2)), 4.0);
        assert_eq!(report.region_deposit_kev.len(), 5);
    }

    #[test]
    fn absorption_site_attribution() {
        // Never exited the filter.
        let p = primary(1, 100.0);
        assert_eq!(
            resolve_fate(&p, TOL),
            Fate::Absorbed {
                site: AbsorptionSite::Filter
            }
        );

        // Exited the filter and entered the water.
        let mut p = primary(1, 100.0);
        p.record_crossing(Boundary::FilterExit, 90.0);
        p.record_crossing(Boundary::WaterEntry, 90.0);
        assert_eq!(
            resolve_fate(&p, TOL),
            Fate::Absorbed {
                site: AbsorptionSite::Water
            }
        );

        // Exited the filter, never entered the water.
        let mut p = primary(1, 100.0);
        p.record_crossing(Boundary::FilterExit, 90.0);
        assert_eq!(
            resolve_fate(&p, TOL),
            Fate::Absorbed {
                site: AbsorptionSite::Unresolved
            }
        );

        // An explicit tag takes precedence.
        p.record_absorption(AbsorptionSite::Water);
        assert_eq!(
            resolve_fate(&p, TOL),
            Fate::Absorbed {
                site: AbsorptionSite::Water
            }
        );
    }

    #[test]
    fn downstream_without_upstream_is_unresolved() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(1), &[primary(1, 100.0)], true);
        ev.record_boundary_crossing(TrackId(1), Boundary::DownstreamPlane, 100.0);
        let report = ev.finish();
        assert_eq!(
            report.primaries[0].fate(),
            Some(Fate::Unresolved(UnresolvedReason::MissedUpstream))
        );
        assert_eq!(report.unresolved_count(), 1);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnresolvedFate { .. })));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate primary TrackId")]
    fn duplicate_primary_ids_are_rejected() {
        let mut t = tracker();
        let _ = t.begin_event(EventId(0), &[primary(1, 100.0), primary(1, 344.0)], false);
    }

    #[test]
    fn quiet_event_buffers_no_unresolved_record() {
        let mut t = tracker();
        let primaries = [primary(1, 100.0), primary(2, 100.0)];
        let mut ev = t.begin_event(EventId(2), &primaries, false);
        ev.record_boundary_crossing(TrackId(1), Boundary::DownstreamPlane, 100.0);
        ev.record_boundary_crossing(TrackId(2), Boundary::UpstreamPlane, 100.0);
        ev.record_boundary_crossing(TrackId(2), Boundary::FilterExit, 95.0);
        let report = ev.finish();
        assert_eq!(report.unresolved_count(), 1);
        assert_eq!(report.absorbed_unresolved_site_count(), 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn dropped_guard_leaves_nothing_for_next_event() {
        let mut t = tracker();
        {
            let mut ev = t.begin_event(EventId(0), &[primary(1, 100.0)], false);
            ev.record_region_deposit(RegionIndex(0), 50.0);
            ev.record_region_deposit(RegionIndex(9), 1.0);
            // dropped without finish
        }
        let ev = t.begin_event(EventId(1), &[], false);
        assert_eq!(ev.region_deposit(RegionIndex(0)), Some(0.0));
        assert_eq!(ev.primary_count(), 0);
        let report = ev.finish();
        assert_eq!(report.rejected_deposits, 0);
        assert_eq!(report.total_deposit_kev(), 0.0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn line_deposit_matrix_is_ring_major() {
        let mut t = tracker();
        let mut ev = t.begin_event(EventId(0), &[], false);
        ev.record_line_deposit(RegionIndex(1), LineIndex(1), 3.0);
        ev.record_line_deposit(RegionIndex(7), LineIndex(0), 3.0);
        ev.record_line_deposit(RegionIndex(0), LineIndex(2), 3.0);
        let report = ev.finish();
        assert_eq!(report.line_deposit(RegionIndex(1), 1), 3.0);
        assert_eq!(report.line_deposit_kev.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn verbose_event_buffers_summary() {
        let mut t = tracker();
        let ev = t.begin_event(EventId(0), &[primary(1, 121.78)], true);
        let report = ev.finish();
        assert!(matches!(
            report.diagnostics.first(),
            Some(Diagnostic::PrimariesGenerated { .. })
        ));
        assert!(matches!(
            report.diagnostics.last(),
            Some(Diagnostic::EventSummary { primaries: 1, .. })
        ));
    }
}
