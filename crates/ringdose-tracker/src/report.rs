//! The finalized outcome of one event, and the observer that consumes it.

use ringdose_core::{
    AbsorptionSite, Diagnostic, EventId, EventPrimaries, Fate, ParticleKind, RegionIndex,
    SecondaryParticle,
};
use ringdose_geometry::CountingPlane;
use serde::Serialize;

// ── Plane tallies ───────────────────────────────────────────────

/// Count and summed kinetic energy of crossings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    /// Number of crossings.
    pub count: u64,
    /// Summed kinetic energy at crossing, keV.
    pub energy_kev: f64,
}

impl Tally {
    /// Add one crossing.
    pub fn add(&mut self, energy_kev: f64) {
        self.count += 1;
        self.energy_kev += energy_kev;
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        self.count += other.count;
        self.energy_kev += other.energy_kev;
    }

    /// Mean energy per crossing, or zero when empty.
    pub fn mean_energy_kev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.energy_kev / self.count as f64
        }
    }
}

/// Crossings of one counting plane split by species and direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PlaneTally {
    /// Photons moving towards +z.
    pub photon_forward: Tally,
    /// Photons moving towards −z.
    pub photon_backward: Tally,
    /// Electrons moving towards +z.
    pub electron_forward: Tally,
    /// Electrons moving towards −z.
    pub electron_backward: Tally,
}

impl PlaneTally {
    /// Record a crossing. Species other than photons and electrons are
    /// not tallied.
    pub fn record(&mut self, particle: ParticleKind, forward: bool, energy_kev: f64) {
        let slot = match (particle, forward) {
            (ParticleKind::Gamma, true) => &mut self.photon_forward,
            (ParticleKind::Gamma, false) => &mut self.photon_backward,
            (ParticleKind::Electron, true) => &mut self.electron_forward,
            (ParticleKind::Electron, false) => &mut self.electron_backward,
            _ => return,
        };
        slot.add(energy_kev);
    }

    /// Add another plane tally into this one.
    pub fn merge(&mut self, other: &PlaneTally) {
        self.photon_forward.merge(&other.photon_forward);
        self.photon_backward.merge(&other.photon_backward);
        self.electron_forward.merge(&other.electron_forward);
        self.electron_backward.merge(&other.electron_backward);
    }
}

/// One [`PlaneTally`] per [`CountingPlane`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PlaneTallies {
    planes: [PlaneTally; CountingPlane::COUNT],
}

impl PlaneTallies {
    /// Tally for `plane`.
    pub fn get(&self, plane: CountingPlane) -> &PlaneTally {
        &self.planes[plane.ordinal()]
    }

    /// Mutable tally for `plane`.
    pub fn get_mut(&mut self, plane: CountingPlane) -> &mut PlaneTally {
        &mut self.planes[plane.ordinal()]
    }

    /// `(plane, tally)` pairs in source-to-water order.
    pub fn iter(&self) -> impl Iterator<Item = (CountingPlane, &PlaneTally)> {
        CountingPlane::ALL.iter().copied().zip(self.planes.iter())
    }

    /// Add another set of tallies into this one.
    pub fn merge(&mut self, other: &PlaneTallies) {
        for (mine, theirs) in self.planes.iter_mut().zip(other.planes.iter()) {
            mine.merge(theirs);
        }
    }
}

// ── Boundary counters ───────────────────────────────────────────

/// Verification counters for volume entries and exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BoundaryCounters {
    /// Primary gammas entering the filter.
    pub filter_entries: u64,
    /// Primary gammas leaving the filter.
    pub filter_exits: u64,
    /// Primary gammas entering the container wall or lid.
    pub container_entries: u64,
    /// Gammas of any generation entering the water.
    pub water_entries: u64,
    /// Electrons entering the water from outside.
    pub electron_water_entries: u64,
}

impl BoundaryCounters {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &BoundaryCounters) {
        self.filter_entries += other.filter_entries;
        self.filter_exits += other.filter_exits;
        self.container_entries += other.container_entries;
        self.water_entries += other.water_entries;
        self.electron_water_entries += other.electron_water_entries;
    }
}

// ── Event report ────────────────────────────────────────────────

/// Everything one finished event contributes to the run.
///
/// Built by [`ActiveEvent::finish`](crate::ActiveEvent::finish). All
/// primaries carry a resolved fate.
#[derive(Clone, Debug, PartialEq)]
pub struct EventReport {
    /// Event identity.
    pub event: EventId,
    /// Finalized primaries, in generation order.
    pub primaries: EventPrimaries,
    /// Deposit per ring for this event, keV. Length = ring count.
    pub region_deposit_kev: Vec<f64>,
    /// Deposit per ring per spectrum line, keV, ring-major.
    pub line_deposit_kev: Vec<f64>,
    /// Number of spectrum lines (row stride of `line_deposit_kev`).
    pub line_count: usize,
    /// Non-primary particles seen at the downstream plane.
    pub secondaries: Vec<SecondaryParticle>,
    /// Counting-plane crossings.
    pub planes: PlaneTallies,
    /// Entry/exit counters.
    pub counters: BoundaryCounters,
    /// Deposits dropped because their ring index was out of range.
    pub rejected_deposits: u64,
    /// Diagnostics buffered during the event.
    pub diagnostics: Vec<Diagnostic>,
}

impl EventReport {
    /// Number of primaries generated.
    pub fn primary_count(&self) -> usize {
        self.primaries.len()
    }

    /// Primaries with the given fate.
    pub fn count_fate(&self, fate: Fate) -> usize {
        self.primaries.iter().filter(|p| p.fate() == Some(fate)).count()
    }

    /// Primaries classified as transmitted.
    pub fn transmitted_count(&self) -> usize {
        self.count_fate(Fate::Transmitted)
    }

    /// Primaries classified as scattered.
    pub fn scattered_count(&self) -> usize {
        self.count_fate(Fate::Scattered)
    }

    /// Primaries classified as absorbed, any site.
    pub fn absorbed_count(&self) -> usize {
        self.primaries.iter().filter(|p| p.absorbed()).count()
    }

    /// Absorbed primaries whose site could not be attributed.
    pub fn absorbed_unresolved_site_count(&self) -> usize {
        self.count_fate(Fate::Absorbed {
            site: AbsorptionSite::Unresolved,
        })
    }

    /// Primaries with [`Fate::Unresolved`].
    pub fn unresolved_count(&self) -> usize {
        self.primaries
            .iter()
            .filter(|p| matches!(p.fate(), Some(Fate::Unresolved(_))))
            .count()
    }

    /// Summed initial energy of all primaries, keV.
    pub fn total_primary_energy_kev(&self) -> f64 {
        self.primaries.iter().map(|p| p.energy_kev).sum()
    }

    /// Total deposit over all rings, keV.
    pub fn total_deposit_kev(&self) -> f64 {
        self.region_deposit_kev.iter().sum()
    }

    /// Deposit in `region`, keV; zero when out of range.
    pub fn region_deposit(&self, region: RegionIndex) -> f64 {
        self.region_deposit_kev
            .get(region.as_usize())
            .copied()
            .unwrap_or(0.0)
    }

    /// Deposit in `region` attributed to spectrum line `line`, keV.
    pub fn line_deposit(&self, region: RegionIndex, line: usize) -> f64 {
        if line >= self.line_count {
            return 0.0;
        }
        self.line_deposit_kev
            .get(region.as_usize() * self.line_count + line)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Consumer of finished events.
///
/// Implemented by the run accumulator and the row-oriented record
/// writers. Infallible: an observer that can fail stores the error and
/// reports it when the run is finished.
pub trait EventObserver {
    /// Called once per finished event, in event order for sequential runs.
    fn on_event(&mut self, report: &EventReport);
}

impl<O: EventObserver + ?Sized> EventObserver for &mut O {
    fn on_event(&mut self, report: &EventReport) {
        (**self).on_event(report);
    }
}

impl<O: EventObserver + ?Sized> EventObserver for Box<O> {
    fn on_event(&mut self, report: &EventReport) {
        (**self).on_event(report);
    }
}
