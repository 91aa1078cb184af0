//! Run-wide aggregation of finished events.
//!
//! [`RunAccumulator`] is the single writer of a [`RunStatistics`]. It
//! ingests one [`EventReport`] per event and never fails: ring indices
//! were already validated by the tracker. Every field is a sum or a
//! bin-wise count, so two accumulators over disjoint event ranges
//! [`merge`](RunStatistics::merge) into the same totals in any order.

use ringdose_core::{AbsorptionSite, Fate};
use ringdose_source::DecaySource;
use ringdose_tracker::{BoundaryCounters, EventObserver, EventReport, PlaneTallies};
use serde::Serialize;

use crate::histogram::RunHistograms;

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

// ── Per-region and per-line sums ────────────────────────────────

/// Deposit sums for one ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RegionStatistics {
    /// Summed per-event deposit, keV.
    pub energy_kev: f64,
    /// Summed squared per-event deposit, keV².
    pub energy_sq_kev2: f64,
    /// Events that deposited anything in this ring.
    pub event_count: u64,
}

impl RegionStatistics {
    fn add_event(&mut self, edep_kev: f64) {
        self.energy_kev += edep_kev;
        self.energy_sq_kev2 += edep_kev * edep_kev;
        self.event_count += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.energy_kev += other.energy_kev;
        self.energy_sq_kev2 += other.energy_sq_kev2;
        self.event_count += other.event_count;
    }

    /// Mean deposit over the events that deposited, keV.
    pub fn mean_kev(&self) -> f64 {
        if self.event_count == 0 {
            0.0
        } else {
            self.energy_kev / self.event_count as f64
        }
    }

    /// Sample variance of the deposit over the events that deposited,
    /// keV². Zero below two events.
    pub fn variance_kev2(&self) -> f64 {
        if self.event_count < 2 {
            return 0.0;
        }
        let n = self.event_count as f64;
        let mean = self.energy_kev / n;
        ((self.energy_sq_kev2 - n * mean * mean) / (n - 1.0)).max(0.0)
    }
}

/// Outcome counts for the primaries of one spectrum line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LineStatistics {
    /// Line energy, keV.
    pub energy_kev: f64,
    /// Primaries generated on this line.
    pub generated: u64,
    /// Primaries that left the filter.
    pub exited_filter: u64,
    /// Primaries absorbed in the filter.
    pub absorbed_in_filter: u64,
    /// Primaries that entered the water.
    pub entered_water: u64,
    /// Primaries absorbed in the water.
    pub absorbed_in_water: u64,
    /// Primaries classified as transmitted.
    pub transmitted: u64,
}

impl LineStatistics {
    fn merge(&mut self, other: &Self) {
        self.generated += other.generated;
        self.exited_filter += other.exited_filter;
        self.absorbed_in_filter += other.absorbed_in_filter;
        self.entered_water += other.entered_water;
        self.absorbed_in_water += other.absorbed_in_water;
        self.transmitted += other.transmitted;
    }

    /// Fraction of generated primaries that were transmitted.
    pub fn transmission(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            self.transmitted as f64 / self.generated as f64
        }
    }
}

// ── RunStatistics ───────────────────────────────────────────────

/// Everything accumulated over a run.
///
/// Sums only grow during a run; [`reset`](RunAccumulator::reset) is the
/// only way back to zero. The source parameters are carried through
/// unchanged for the dose normalizer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunStatistics {
    /// One entry per ring.
    pub regions: Vec<RegionStatistics>,
    /// Events ingested.
    pub events: u64,
    /// Primaries generated.
    pub total_primaries: u64,
    /// Events with no primary at all.
    pub zero_primary_events: u64,
    /// Primaries classified as transmitted.
    pub transmitted: u64,
    /// Primaries classified as absorbed, any site.
    pub absorbed: u64,
    /// Primaries that crossed both planes with too much energy loss.
    pub scattered: u64,
    /// Absorbed primaries attributed to the filter.
    pub absorbed_in_filter: u64,
    /// Absorbed primaries attributed to the water.
    pub absorbed_in_water: u64,
    /// Absorbed primaries with no attributable site.
    pub absorbed_site_unresolved: u64,
    /// Primaries seen downstream without an upstream crossing.
    pub unresolved: u64,
    /// Secondary particles recorded at the downstream plane.
    pub secondaries: u64,
    /// Deposits dropped for an out-of-range ring index.
    pub rejected_deposits: u64,
    /// Summed per-event deposit over all rings, keV.
    pub water_energy_kev: f64,
    /// Events with any deposit in the water.
    pub water_event_count: u64,
    /// Source activity, Bq.
    pub activity_bq: f64,
    /// Emission cone half-angle, rad.
    pub cone_half_angle_rad: f64,
    /// Expected primaries per decay.
    pub mean_primaries_per_decay: f64,
    /// One entry per spectrum line.
    pub lines: Vec<LineStatistics>,
    /// Deposit per ring per line, keV, ring-major.
    pub line_region_energy_kev: Vec<f64>,
    /// Entry/exit counters.
    pub counters: BoundaryCounters,
    /// Counting-plane crossings.
    pub planes: PlaneTallies,
    /// Per-event distributions.
    pub histograms: RunHistograms,
}

impl RunStatistics {
    /// Empty statistics for `region_count` rings and the lines of
    /// `source`.
    pub fn new(region_count: usize, source: &DecaySource) -> Self {
        let lines: Vec<LineStatistics> = source
            .spectrum()
            .lines()
            .iter()
            .map(|line| LineStatistics {
                energy_kev: line.energy_kev,
                ..LineStatistics::default()
            })
            .collect();
        Self {
            regions: vec![RegionStatistics::default(); region_count],
            events: 0,
            total_primaries: 0,
            zero_primary_events: 0,
            transmitted: 0,
            absorbed: 0,
            scattered: 0,
            absorbed_in_filter: 0,
            absorbed_in_water: 0,
            absorbed_site_unresolved: 0,
            unresolved: 0,
            secondaries: 0,
            rejected_deposits: 0,
            water_energy_kev: 0.0,
            water_event_count: 0,
            activity_bq: source.activity_bq(),
            cone_half_angle_rad: source.cone().half_angle_rad(),
            mean_primaries_per_decay: source.mean_primaries_per_decay(),
            line_region_energy_kev: vec![0.0; region_count * lines.len()],
            lines,
            counters: BoundaryCounters::default(),
            planes: PlaneTallies::default(),
            histograms: RunHistograms::new(region_count),
        }
    }

    /// Number of rings.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of spectrum lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Deposit in ring `region` attributed to line `line`, keV.
    pub fn line_region_energy(&self, region: usize, line: usize) -> f64 {
        if line >= self.lines.len() {
            return 0.0;
        }
        self.line_region_energy_kev
            .get(region * self.lines.len() + line)
            .copied()
            .unwrap_or(0.0)
    }

    /// Observed primaries per event, or zero before the first event.
    pub fn observed_primaries_per_event(&self) -> f64 {
        ratio(self.total_primaries, self.events)
    }

    /// Fraction of events with no primary.
    pub fn zero_primary_fraction(&self) -> f64 {
        ratio(self.zero_primary_events, self.events)
    }

    /// Fraction of generated primaries classified as transmitted.
    pub fn transmission_rate(&self) -> f64 {
        ratio(self.transmitted, self.total_primaries)
    }

    /// Fraction of generated primaries classified as absorbed.
    pub fn absorption_rate(&self) -> f64 {
        ratio(self.absorbed, self.total_primaries)
    }

    /// Fold one finished event in.
    pub fn ingest(&mut self, report: &EventReport) {
        self.events += 1;
        self.total_primaries += report.primary_count() as u64;
        if report.primaries.is_empty() {
            self.zero_primary_events += 1;
        }

        for primary in &report.primaries {
            match primary.fate() {
                Some(Fate::Transmitted) => self.transmitted += 1,
                Some(Fate::Scattered) => self.scattered += 1,
                Some(Fate::Absorbed { site }) => {
                    self.absorbed += 1;
                    match site {
                        AbsorptionSite::Filter => self.absorbed_in_filter += 1,
                        AbsorptionSite::Water => self.absorbed_in_water += 1,
                        AbsorptionSite::Unresolved => self.absorbed_site_unresolved += 1,
                    }
                }
                Some(Fate::Unresolved(_)) | None => self.unresolved += 1,
            }
            if let Some(line) = self.lines.get_mut(primary.line.as_usize()) {
                line.generated += 1;
                line.exited_filter += u64::from(primary.exited_filter());
                line.entered_water += u64::from(primary.entered_water());
                line.absorbed_in_filter += u64::from(primary.absorbed_in_filter());
                line.absorbed_in_water += u64::from(primary.absorbed_in_water());
                line.transmitted += u64::from(primary.transmitted());
            }
        }

        for (stats, &edep) in self.regions.iter_mut().zip(&report.region_deposit_kev) {
            if edep > 0.0 {
                stats.add_event(edep);
            }
        }

        let stride = self.lines.len();
        if stride > 0 && report.line_count > 0 {
            let common = stride.min(report.line_count);
            let rows = report.line_deposit_kev.chunks(report.line_count);
            for (row, target) in rows.zip(self.line_region_energy_kev.chunks_mut(stride)) {
                for (t, &e) in target.iter_mut().zip(row).take(common) {
                    *t += e;
                }
            }
        }

        let water = report.total_deposit_kev();
        if water > 0.0 {
            self.water_energy_kev += water;
            self.water_event_count += 1;
        }

        self.secondaries += report.secondaries.len() as u64;
        self.rejected_deposits += report.rejected_deposits;
        self.counters.merge(&report.counters);
        self.planes.merge(&report.planes);
        self.histograms.record(report);
    }

    /// Add the sums of `other` into this one.
    ///
    /// Source parameters are kept from `self`; both sides are expected to
    /// come from the same configuration.
    pub fn merge(&mut self, other: &RunStatistics) {
        for (mine, theirs) in self.regions.iter_mut().zip(&other.regions) {
            mine.merge(theirs);
        }
        self.events += other.events;
        self.total_primaries += other.total_primaries;
        self.zero_primary_events += other.zero_primary_events;
        self.transmitted += other.transmitted;
        self.absorbed += other.absorbed;
        self.scattered += other.scattered;
        self.absorbed_in_filter += other.absorbed_in_filter;
        self.absorbed_in_water += other.absorbed_in_water;
        self.absorbed_site_unresolved += other.absorbed_site_unresolved;
        self.unresolved += other.unresolved;
        self.secondaries += other.secondaries;
        self.rejected_deposits += other.rejected_deposits;
        self.water_energy_kev += other.water_energy_kev;
        self.water_event_count += other.water_event_count;
        for (mine, theirs) in self.lines.iter_mut().zip(&other.lines) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self
            .line_region_energy_kev
            .iter_mut()
            .zip(&other.line_region_energy_kev)
        {
            *mine += theirs;
        }
        self.counters.merge(&other.counters);
        self.planes.merge(&other.planes);
        self.histograms.merge(&other.histograms);
    }

    fn clear(&mut self) {
        self.regions.iter_mut().for_each(|r| *r = RegionStatistics::default());
        self.events = 0;
        self.total_primaries = 0;
        self.zero_primary_events = 0;
        self.transmitted = 0;
        self.absorbed = 0;
        self.scattered = 0;
        self.absorbed_in_filter = 0;
        self.absorbed_in_water = 0;
        self.absorbed_site_unresolved = 0;
        self.unresolved = 0;
        self.secondaries = 0;
        self.rejected_deposits = 0;
        self.water_energy_kev = 0.0;
        self.water_event_count = 0;
        for line in &mut self.lines {
            *line = LineStatistics {
                energy_kev: line.energy_kev,
                ..LineStatistics::default()
            };
        }
        self.line_region_energy_kev.iter_mut().for_each(|e| *e = 0.0);
        self.counters = BoundaryCounters::default();
        self.planes = PlaneTallies::default();
        self.histograms.clear();
    }
}

// ── RunAccumulator ──────────────────────────────────────────────

/// Single-writer owner of the run's [`RunStatistics`].
#[derive(Clone, Debug)]
pub struct RunAccumulator {
    stats: RunStatistics,
}

impl RunAccumulator {
    /// An empty accumulator for `region_count` rings and `source`.
    pub fn new(region_count: usize, source: &DecaySource) -> Self {
        Self {
            stats: RunStatistics::new(region_count, source),
        }
    }

    /// Fold one finished event in. Called exactly once per event.
    pub fn ingest(&mut self, report: &EventReport) {
        self.stats.ingest(report);
    }

    /// Merge a partial accumulator covering a disjoint event range.
    pub fn merge(&mut self, other: &RunAccumulator) {
        self.stats.merge(&other.stats);
    }

    /// Zero every sum, keeping the shape and the source parameters.
    pub fn reset(&mut self) {
        self.stats.clear();
    }

    /// Current statistics.
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    /// Consume into the statistics.
    pub fn into_statistics(self) -> RunStatistics {
        self.stats
    }
}

impl EventObserver for RunAccumulator {
    fn on_event(&mut self, report: &EventReport) {
        self.ingest(report);
    }
}
