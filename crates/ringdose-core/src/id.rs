//! Strongly-typed identifiers.

use serde::Serialize;
use std::fmt;

/// Identifies one simulated decay event within a run.
///
/// Event IDs are assigned sequentially from zero by the run driver and
/// double as the RNG stream selector, so a given `(seed, EventId)` pair
/// always produces the same primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a particle track within one event.
///
/// Only meaningful inside the event that produced it: the transport engine
/// is free to reuse numeric track IDs across events. `TrackId(0)` is the
/// "no parent" sentinel carried by primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrackId(pub u32);

impl TrackId {
    /// Parent ID carried by primary tracks.
    pub const NONE: TrackId = TrackId(0);

    /// Identity assigned to the `n`-th primary (zero-based) of an event.
    ///
    /// Primaries are numbered `1..=n` in generation order.
    pub fn for_primary(n: usize) -> Self {
        Self(n as u32 + 1)
    }

    /// Whether this is the "no parent" sentinel.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrackId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Index of a concentric dose-scoring ring.
///
/// Ring 0 is the central disc; ring `i` spans `[i·w, (i+1)·w)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionIndex(pub u32);

impl RegionIndex {
    /// The index as a `usize`, for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RegionIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Index of a line in the emission spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineIndex(pub u32);

impl LineIndex {
    /// The index as a `usize`, for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LineIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
