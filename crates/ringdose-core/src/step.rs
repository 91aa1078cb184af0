//! The per-step record handed from the transport engine to the pipeline.

use crate::id::{EventId, TrackId};
use crate::particle::{ParticleKind, TrackStatus, Vec3};

/// One transport step, as seen by the tracking pipeline.
///
/// Borrowed from the engine for the duration of the callback only. Volume
/// names are logical-volume names; `post_volume` is `None` when the step
/// leaves the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPoint<'a> {
    /// Event this step belongs to.
    pub event: EventId,
    /// Volume the step started in.
    pub pre_volume: &'a str,
    /// Volume the step ends in, if still inside the world.
    pub post_volume: Option<&'a str>,
    /// Track taking the step.
    pub track: TrackId,
    /// Parent of the track ([`TrackId::NONE`] for primaries).
    pub parent: TrackId,
    /// Particle species.
    pub particle: ParticleKind,
    /// Kinetic energy at the start of the step, keV.
    pub kinetic_energy_kev: f64,
    /// Energy deposited during the step, keV.
    pub energy_deposit_kev: f64,
    /// Pre-step position, mm.
    pub position: Vec3,
    /// Pre-step momentum direction (unit vector).
    pub direction: Vec3,
    /// Track status after the step.
    pub status: TrackStatus,
    /// Process that created the track; `None` for primaries.
    pub creator_process: Option<&'a str>,
}

impl StepPoint<'_> {
    /// Whether this is a primary track.
    pub fn is_primary(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether the step crosses from one volume into a different one.
    pub fn crosses_boundary(&self) -> bool {
        matches!(self.post_volume, Some(post) if post != self.pre_volume)
    }

    /// The volume entered by this step, if it crosses a boundary.
    pub fn entered_volume(&self) -> Option<&str> {
        match self.post_volume {
            Some(post) if post != self.pre_volume => Some(post),
            _ => None,
        }
    }

    /// Whether the track moves towards +z.
    pub fn is_forward(&self) -> bool {
        self.direction.z > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step<'a>(pre: &'a str, post: Option<&'a str>) -> StepPoint<'a> {
        StepPoint {
            event: EventId(0),
            pre_volume: pre,
            post_volume: post,
            track: TrackId(1),
            parent: TrackId::NONE,
            particle: ParticleKind::Gamma,
            kinetic_energy_kev: 121.78,
            energy_deposit_kev: 0.0,
            position: Vec3::default(),
            direction: Vec3::new(0.0, 0.0, 1.0),
            status: TrackStatus::Alive,
            creator_process: None,
        }
    }

    #[test]
    fn entered_volume_requires_a_different_volume() {
        assert_eq!(step("World", Some("FilterLog")).entered_volume(), Some("FilterLog"));
        assert_eq!(step("FilterLog", Some("FilterLog")).entered_volume(), None);
        assert_eq!(step("FilterLog", None).entered_volume(), None);
        assert!(!step("FilterLog", None).crosses_boundary());
    }

    #[test]
    fn primaries_have_no_parent() {
        let mut s = step("World", None);
        assert!(s.is_primary());
        s.parent = TrackId(1);
        assert!(!s.is_primary());
        assert!(s.is_forward());
    }
}
