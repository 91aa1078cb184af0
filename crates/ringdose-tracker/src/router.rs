//! Routing raw transport steps onto tracker operations.
//!
//! Each step is classified by its pre- and post-step volume through the
//! tracker's [`VolumeLayout`](ringdose_geometry::VolumeLayout) and then
//! checked against every rule independently; one step can trigger several.

use crate::tracker::ActiveEvent;
use ringdose_core::{
    AbsorptionSite, Boundary, LineIndex, ParticleKind, RegionIndex, SecondaryParticle,
    StepObserver, StepPoint, TrackStatus,
};
use ringdose_geometry::VolumeKind;

const UNKNOWN_PROCESS: &str = "unknown";

impl ActiveEvent<'_> {
    /// Spectrum line of the primary responsible for a step: the track
    /// itself when it is a registered primary, else its direct parent.
    fn responsible_line(&self, step: &StepPoint<'_>) -> Option<LineIndex> {
        let primaries = &self.tracker.primaries;
        if step.is_primary() {
            if let Some(p) = primaries.get(&step.track) {
                return Some(p.line);
            }
        }
        primaries.get(&step.parent).map(|p| p.line)
    }

    fn is_primary_gamma(step: &StepPoint<'_>) -> bool {
        step.is_primary() && step.particle == ParticleKind::Gamma
    }

    fn on_ring_deposit(&mut self, region: RegionIndex, step: &StepPoint<'_>) {
        let edep = step.energy_deposit_kev;
        if edep.is_nan() || edep <= 0.0 {
            return;
        }
        if self.record_region_deposit(region, edep) {
            if let Some(line) = self.responsible_line(step) {
                self.record_line_deposit(region, line, edep);
            }
        }
    }

    fn on_plane_entry(&mut self, kind: VolumeKind, step: &StepPoint<'_>) {
        if !step.is_forward() {
            return;
        }
        let boundary = match kind {
            VolumeKind::UpstreamPlane => Boundary::UpstreamPlane,
            VolumeKind::DownstreamPlane => Boundary::DownstreamPlane,
            _ => return,
        };
        if Self::is_primary_gamma(step) {
            self.record_boundary_crossing(step.track, boundary, step.kinetic_energy_kev);
        } else if boundary == Boundary::DownstreamPlane {
            self.record_secondary(SecondaryParticle {
                track: step.track,
                parent: step.parent,
                particle: step.particle,
                energy_kev: step.kinetic_energy_kev,
                process: step
                    .creator_process
                    .unwrap_or(UNKNOWN_PROCESS)
                    .to_string(),
            });
        }
    }
}

impl StepObserver for ActiveEvent<'_> {
    fn on_step(&mut self, step: &StepPoint<'_>) {
        let layout = &self.tracker.layout;
        let pre = layout.classify(step.pre_volume);
        let post = step.entered_volume().and_then(|name| layout.classify(name));
        let entered_other = step.entered_volume().is_some();
        let primary_gamma = Self::is_primary_gamma(step);

        // Ring deposit, attributed to the responsible primary's line.
        if let Some(VolumeKind::Ring(region)) = pre {
            self.on_ring_deposit(region, step);
        }

        // Primary gamma stopped: explicit absorption tag.
        if primary_gamma && step.status == TrackStatus::Stopped {
            match pre {
                Some(VolumeKind::Filter) => {
                    self.record_absorption(step.track, AbsorptionSite::Filter);
                }
                Some(VolumeKind::Ring(_)) => {
                    self.record_absorption(step.track, AbsorptionSite::Water);
                }
                _ => {}
            }
        }

        if !entered_other {
            return;
        }

        // Filter entry and exit.
        if primary_gamma {
            let pre_filter = pre == Some(VolumeKind::Filter);
            let post_filter = post == Some(VolumeKind::Filter);
            if post_filter && !pre_filter {
                self.tracker.counters.filter_entries += 1;
            }
            if pre_filter && !post_filter {
                self.tracker.counters.filter_exits += 1;
                self.record_boundary_crossing(
                    step.track,
                    Boundary::FilterExit,
                    step.kinetic_energy_kev,
                );
            }
            if post == Some(VolumeKind::ContainerWall) && pre != Some(VolumeKind::ContainerWall) {
                self.tracker.counters.container_entries += 1;
            }
        }

        match post {
            // Entering the water from outside it.
            Some(VolumeKind::Ring(_)) if !matches!(pre, Some(VolumeKind::Ring(_))) => {
                match step.particle {
                    ParticleKind::Gamma => {
                        self.tracker.counters.water_entries += 1;
                        if primary_gamma {
                            self.record_boundary_crossing(
                                step.track,
                                Boundary::WaterEntry,
                                step.kinetic_energy_kev,
                            );
                        }
                    }
                    ParticleKind::Electron => {
                        self.tracker.counters.electron_water_entries += 1;
                    }
                    _ => {}
                }
            }
            Some(VolumeKind::Counting(plane)) => {
                self.tracker.planes.get_mut(plane).record(
                    step.particle,
                    step.is_forward(),
                    step.kinetic_energy_kev,
                );
            }
            Some(kind @ (VolumeKind::UpstreamPlane | VolumeKind::DownstreamPlane)) => {
                self.on_plane_entry(kind, step);
            }
            _ => {}
        }
    }
}
