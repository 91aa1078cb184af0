//! Volume-name layout: what each named volume means to the tracker.

use crate::error::GeometryError;
use indexmap::IndexMap;
use ringdose_core::RegionIndex;
use std::fmt;

const RING_PREFIX: &str = "WaterRing_";
const RING_SUFFIX: &str = "Log";

/// A thin counting plane. Crossings are tallied, not attributed to
/// individual primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountingPlane {
    /// Source side of the filter.
    PreFilter,
    /// Water side of the filter.
    PostFilter,
    /// Source side of the container top.
    PreContainer,
    /// Inside the container, above the water.
    PostContainer,
    /// Directly above the water surface.
    PreWater,
    /// Directly below the water.
    PostWater,
}

impl CountingPlane {
    /// Number of counting planes.
    pub const COUNT: usize = 6;

    /// All planes, ordered from the source towards the water.
    pub const ALL: [CountingPlane; Self::COUNT] = [
        CountingPlane::PreFilter,
        CountingPlane::PostFilter,
        CountingPlane::PreContainer,
        CountingPlane::PostContainer,
        CountingPlane::PreWater,
        CountingPlane::PostWater,
    ];

    /// Position in [`CountingPlane::ALL`].
    pub fn ordinal(self) -> usize {
        match self {
            Self::PreFilter => 0,
            Self::PostFilter => 1,
            Self::PreContainer => 2,
            Self::PostContainer => 3,
            Self::PreWater => 4,
            Self::PostWater => 5,
        }
    }

    /// Short label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::PreFilter => "pre_filter",
            Self::PostFilter => "post_filter",
            Self::PreContainer => "pre_container",
            Self::PostContainer => "post_container",
            Self::PreWater => "pre_water",
            Self::PostWater => "post_water",
        }
    }
}

impl fmt::Display for CountingPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role of a named volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumeKind {
    /// The attenuating filter.
    Filter,
    /// Container wall or lid.
    ContainerWall,
    /// A water scoring ring. The index is not checked against any catalog.
    Ring(RegionIndex),
    /// Reference plane between source and filter.
    UpstreamPlane,
    /// Reference plane between filter and water.
    DownstreamPlane,
    /// A counting plane.
    Counting(CountingPlane),
}

/// Lookup from volume name to [`VolumeKind`].
///
/// Names not registered explicitly still classify as a ring when they
/// follow the `WaterRing_<i>Log` pattern, whatever `i` is. Everything else
/// (world, air, source holder) classifies as `None`.
#[derive(Clone, Debug, Default)]
pub struct VolumeLayout {
    volumes: IndexMap<String, VolumeKind>,
}

impl VolumeLayout {
    /// An empty layout. Only the ring naming pattern is recognised.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference layout with `ring_count` water rings.
    pub fn reference(ring_count: u32) -> Self {
        let mut volumes = IndexMap::new();
        volumes.insert("FilterLog".to_string(), VolumeKind::Filter);
        volumes.insert("ContainerWallLog".to_string(), VolumeKind::ContainerWall);
        volumes.insert("ContainerTopLog".to_string(), VolumeKind::ContainerWall);
        volumes.insert("UpstreamDetector".to_string(), VolumeKind::UpstreamPlane);
        volumes.insert("DownstreamDetector".to_string(), VolumeKind::DownstreamPlane);
        for (name, plane) in [
            ("PreFilterPlaneLog", CountingPlane::PreFilter),
            ("PostFilterPlaneLog", CountingPlane::PostFilter),
            ("PreContainerPlaneLog", CountingPlane::PreContainer),
            ("PostContainerPlaneLog", CountingPlane::PostContainer),
            ("PreWaterPlaneLog", CountingPlane::PreWater),
            ("PostWaterPlaneLog", CountingPlane::PostWater),
        ] {
            volumes.insert(name.to_string(), VolumeKind::Counting(plane));
        }
        for i in 0..ring_count {
            volumes.insert(Self::ring_name(i), VolumeKind::Ring(RegionIndex(i)));
        }
        Self { volumes }
    }

    /// Canonical volume name of ring `i`.
    pub fn ring_name(i: u32) -> String {
        format!("{RING_PREFIX}{i}{RING_SUFFIX}")
    }

    /// Register `name` as `kind`.
    pub fn insert(&mut self, name: impl Into<String>, kind: VolumeKind) -> Result<(), GeometryError> {
        let name = name.into();
        if self.volumes.contains_key(&name) {
            return Err(GeometryError::DuplicateVolume { name });
        }
        self.volumes.insert(name, kind);
        Ok(())
    }

    /// Classify a volume name.
    pub fn classify(&self, name: &str) -> Option<VolumeKind> {
        if let Some(kind) = self.volumes.get(name) {
            return Some(*kind);
        }
        parse_ring_name(name).map(VolumeKind::Ring)
    }

    /// Whether `name` is a water ring.
    pub fn is_ring(&self, name: &str) -> bool {
        matches!(self.classify(name), Some(VolumeKind::Ring(_)))
    }

    /// Number of explicitly registered volumes.
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Whether no volume is registered explicitly.
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Registered names and kinds, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, VolumeKind)> {
        self.volumes.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

fn parse_ring_name(name: &str) -> Option<RegionIndex> {
    let digits = name.strip_prefix(RING_PREFIX)?.strip_suffix(RING_SUFFIX)?;
    digits.parse::<u32>().ok().map(RegionIndex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_layout_names() {
        let layout = VolumeLayout::reference(5);
        assert_eq!(layout.classify("FilterLog"), Some(VolumeKind::Filter));
        assert_eq!(layout.classify("ContainerTopLog"), Some(VolumeKind::ContainerWall));
        assert_eq!(
            layout.classify("DownstreamDetector"),
            Some(VolumeKind::DownstreamPlane)
        );
        assert_eq!(
            layout.classify("PreWaterPlaneLog"),
            Some(VolumeKind::Counting(CountingPlane::PreWater))
        );
        assert_eq!(
            layout.classify("WaterRing_4Log"),
            Some(VolumeKind::Ring(RegionIndex(4)))
        );
        assert_eq!(layout.classify("World"), None);
        assert_eq!(layout.len(), 11 + 5);
    }

    #[test]
    fn unknown_ring_index_still_classifies() {
        let layout = VolumeLayout::reference(5);
        assert_eq!(
            layout.classify("WaterRing_9Log"),
            Some(VolumeKind::Ring(RegionIndex(9)))
        );
        assert_eq!(layout.classify("WaterRing_xLog"), None);
        assert_eq!(layout.classify("WaterRing_3"), None);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut layout = VolumeLayout::new();
        layout.insert("Lead", VolumeKind::Filter).unwrap();
        match layout.insert("Lead", VolumeKind::ContainerWall) {
            Err(GeometryError::DuplicateVolume { name }) => assert_eq!(name, "Lead"),
            other => panic!("expected DuplicateVolume, got {other:?}"),
        }
        assert_eq!(layout.classify("Lead"), Some(VolumeKind::Filter));
    }

    #[test]
    fn counting_plane_ordinals_match_all() {
        for (i, plane) in CountingPlane::ALL.iter().enumerate() {
            assert_eq!(plane.ordinal(), i);
        }
    }
}
