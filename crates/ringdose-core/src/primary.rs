//! Primary-emission bookkeeping: crossings, absorption tags, and fates.

use crate::id::{LineIndex, TrackId};
use crate::particle::ParticleKind;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Primaries of one event. Eu-152 averages under two per decay.
pub type EventPrimaries = SmallVec<[PrimaryEmission; 4]>;

/// A surface at which a primary's energy is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Boundary {
    /// Reference plane between the source and the filter.
    UpstreamPlane,
    /// Reference plane beyond the filter, in front of the water.
    DownstreamPlane,
    /// Leaving the attenuating filter.
    FilterExit,
    /// Entering any water ring from outside the water.
    WaterEntry,
}

impl Boundary {
    /// All boundary kinds, in declaration order.
    pub const ALL: [Boundary; 4] = [
        Boundary::UpstreamPlane,
        Boundary::DownstreamPlane,
        Boundary::FilterExit,
        Boundary::WaterEntry,
    ];
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamPlane => write!(f, "upstream plane"),
            Self::DownstreamPlane => write!(f, "downstream plane"),
            Self::FilterExit => write!(f, "filter exit"),
            Self::WaterEntry => write!(f, "water entry"),
        }
    }
}

/// Where an absorbed primary is taken to have stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AbsorptionSite {
    /// Stopped inside the filter.
    Filter,
    /// Stopped inside the water.
    Water,
    /// Downstream plane never reached, filter exited, water never entered.
    Unresolved,
}

/// Why a primary's fate could not be classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UnresolvedReason {
    /// Seen at the downstream plane but never at the upstream plane.
    MissedUpstream,
}

/// Final classification of a primary at event end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Fate {
    /// Both planes observed and the energy change is within tolerance.
    Transmitted,
    /// Both planes observed but the energy change exceeds tolerance.
    Scattered,
    /// The downstream plane was never observed.
    Absorbed {
        /// Attributed absorption site.
        site: AbsorptionSite,
    },
    /// No classification applies.
    Unresolved(UnresolvedReason),
}

impl Fate {
    /// Short label for row-oriented records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Transmitted => "transmitted",
            Self::Scattered => "scattered",
            Self::Absorbed {
                site: AbsorptionSite::Filter,
            } => "absorbed_filter",
            Self::Absorbed {
                site: AbsorptionSite::Water,
            } => "absorbed_water",
            Self::Absorbed {
                site: AbsorptionSite::Unresolved,
            } => "absorbed_unknown",
            Self::Unresolved(UnresolvedReason::MissedUpstream) => "unresolved",
        }
    }
}

impl fmt::Display for Fate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One gamma ray generated at event start.
///
/// Crossing energies are only meaningful once the matching flag accessor
/// (`detected_upstream`, `exited_filter`, ...) returns `true`; the
/// `Option` encodes exactly that. A repeated crossing of the same boundary
/// overwrites the earlier energy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimaryEmission {
    /// Identity within the owning event.
    pub id: TrackId,
    /// Spectrum line this emission was drawn from.
    pub line: LineIndex,
    /// Initial kinetic energy, keV.
    pub energy_kev: f64,
    /// Initial polar angle from the emission axis, radians.
    pub theta: f64,
    /// Initial azimuth, radians.
    pub phi: f64,
    upstream_kev: Option<f64>,
    downstream_kev: Option<f64>,
    filter_exit_kev: Option<f64>,
    water_entry_kev: Option<f64>,
    absorption_tag: Option<AbsorptionSite>,
    fate: Option<Fate>,
}

impl PrimaryEmission {
    /// A freshly generated primary with no observations.
    pub fn new(id: TrackId, line: LineIndex, energy_kev: f64, theta: f64, phi: f64) -> Self {
        Self {
            id,
            line,
            energy_kev,
            theta,
            phi,
            upstream_kev: None,
            downstream_kev: None,
            filter_exit_kev: None,
            water_entry_kev: None,
            absorption_tag: None,
            fate: None,
        }
    }

    /// Record the energy observed at `boundary`. Last write wins.
    pub fn record_crossing(&mut self, boundary: Boundary, energy_kev: f64) {
        let slot = match boundary {
            Boundary::UpstreamPlane => &mut self.upstream_kev,
            Boundary::DownstreamPlane => &mut self.downstream_kev,
            Boundary::FilterExit => &mut self.filter_exit_kev,
            Boundary::WaterEntry => &mut self.water_entry_kev,
        };
        *slot = Some(energy_kev);
    }

    /// Energy observed at `boundary`, if it was crossed.
    pub fn crossing(&self, boundary: Boundary) -> Option<f64> {
        match boundary {
            Boundary::UpstreamPlane => self.upstream_kev,
            Boundary::DownstreamPlane => self.downstream_kev,
            Boundary::FilterExit => self.filter_exit_kev,
            Boundary::WaterEntry => self.water_entry_kev,
        }
    }

    /// Tag an explicit absorption site. Last write wins.
    pub fn record_absorption(&mut self, site: AbsorptionSite) {
        self.absorption_tag = Some(site);
    }

    /// The explicit absorption tag, if one was recorded.
    pub fn absorption_tag(&self) -> Option<AbsorptionSite> {
        self.absorption_tag
    }

    /// Store the resolved fate.
    pub fn finalize(&mut self, fate: Fate) {
        self.fate = Some(fate);
    }

    /// The resolved fate; `None` until the event is finished.
    pub fn fate(&self) -> Option<Fate> {
        self.fate
    }

    /// Energy at the upstream plane.
    pub fn energy_upstream(&self) -> Option<f64> {
        self.upstream_kev
    }

    /// Energy at the downstream plane.
    pub fn energy_downstream(&self) -> Option<f64> {
        self.downstream_kev
    }

    /// Seen at the upstream plane.
    pub fn detected_upstream(&self) -> bool {
        self.upstream_kev.is_some()
    }

    /// Seen at the downstream plane.
    pub fn detected_downstream(&self) -> bool {
        self.downstream_kev.is_some()
    }

    /// Left the filter at least once.
    pub fn exited_filter(&self) -> bool {
        self.filter_exit_kev.is_some()
    }

    /// Entered the water at least once.
    pub fn entered_water(&self) -> bool {
        self.water_entry_kev.is_some()
    }

    /// Classified as transmitted.
    pub fn transmitted(&self) -> bool {
        self.fate == Some(Fate::Transmitted)
    }

    /// Classified as absorbed, at any site.
    pub fn absorbed(&self) -> bool {
        matches!(self.fate, Some(Fate::Absorbed { .. }))
    }

    /// Classified as absorbed in the filter.
    pub fn absorbed_in_filter(&self) -> bool {
        self.fate
            == Some(Fate::Absorbed {
                site: AbsorptionSite::Filter,
            })
    }

    /// Classified as absorbed in the water.
    pub fn absorbed_in_water(&self) -> bool {
        self.fate
            == Some(Fate::Absorbed {
                site: AbsorptionSite::Water,
            })
    }
}

/// A non-primary particle seen crossing the downstream plane.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SecondaryParticle {
    /// Track identity within the event.
    pub track: TrackId,
    /// Parent track identity.
    pub parent: TrackId,
    /// Particle species.
    pub particle: ParticleKind,
    /// Kinetic energy at the crossing, keV.
    pub energy_kev: f64,
    /// Label of the creating process (`"unknown"` if the engine gave none).
    pub process: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> PrimaryEmission {
        PrimaryEmission::new(TrackId(1), LineIndex(2), 121.78, 0.3, 1.0)
    }

    #[test]
    fn fresh_primary_has_no_flags() {
        let p = primary();
        assert!(!p.detected_upstream());
        assert!(!p.detected_downstream());
        assert!(!p.exited_filter());
        assert!(!p.entered_water());
        assert!(!p.transmitted());
        assert!(!p.absorbed());
        assert_eq!(p.fate(), None);
    }

    #[test]
    fn repeated_crossing_keeps_last_energy() {
        let mut p = primary();
        p.record_crossing(Boundary::DownstreamPlane, 120.0);
        p.record_crossing(Boundary::DownstreamPlane, 80.0);
        assert_eq!(p.energy_downstream(), Some(80.0));
        assert!(p.detected_downstream());
        assert!(!p.detected_upstream());
    }

    #[test]
    fn absorption_flags_follow_fate() {
        let mut p = primary();
        p.finalize(Fate::Absorbed {
            site: AbsorptionSite::Water,
        });
        assert!(p.absorbed());
        assert!(p.absorbed_in_water());
        assert!(!p.absorbed_in_filter());
        assert!(!p.transmitted());
    }

    #[test]
    fn fate_labels_are_distinct() {
        let labels = [
            Fate::Transmitted,
            Fate::Scattered,
            Fate::Absorbed {
                site: AbsorptionSite::Filter,
            },
            Fate::Absorbed {
                site: AbsorptionSite::Water,
            },
            Fate::Absorbed {
                site: AbsorptionSite::Unresolved,
            },
            Fate::Unresolved(UnresolvedReason::MissedUpstream),
        ]
        .map(Fate::label);
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
