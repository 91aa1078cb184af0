//! Geometry collaborators for ringdose.
//!
//! - [`RegionCatalog`]: the concentric water rings used for dose scoring,
//!   with their radial bounds and masses.
//! - [`VolumeLayout`]: maps the logical-volume names reported by the
//!   transport engine onto the roles the tracking pipeline cares about.
//!
//! Both are built once at run start and read-only afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod layout;

pub use catalog::{Region, RegionCatalog};
pub use error::GeometryError;
pub use layout::{CountingPlane, VolumeKind, VolumeLayout};
