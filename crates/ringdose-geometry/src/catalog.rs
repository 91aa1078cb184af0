//! The region catalog: concentric water rings of fixed width.

use crate::error::GeometryError;
use ringdose_core::units::KG_PER_MM3_PER_G_PER_CM3;
use ringdose_core::RegionIndex;
use serde::Serialize;
use std::f64::consts::PI;

/// One annular scoring ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Region {
    /// Ring index, `0..N`.
    pub index: RegionIndex,
    /// Inner radius, mm.
    pub inner_radius_mm: f64,
    /// Outer radius, mm.
    pub outer_radius_mm: f64,
    /// Axial thickness, mm.
    pub thickness_mm: f64,
    /// Mass, kg.
    pub mass_kg: f64,
}

impl Region {
    /// Whether a radial distance (mm) falls inside this ring.
    pub fn contains_radius(&self, r: f64) -> bool {
        r >= self.inner_radius_mm && r < self.outer_radius_mm
    }
}

/// Immutable lookup from ring index to bounds and mass.
///
/// Ring `i` spans `[i·w, (i+1)·w)` so the rings partition the disc of
/// radius `N·w` with no gaps or overlaps. Masses are precomputed at
/// construction as `π·(r_out² − r_in²)·t·ρ`.
///
/// # Examples
///
/// ```
/// use ringdose_geometry::RegionCatalog;
///
/// let catalog = RegionCatalog::new(5, 5.0, 5.0, 1.0).unwrap();
/// assert_eq!(catalog.region_count(), 5);
/// assert_eq!(catalog.inner_radius(0), Some(0.0));
/// assert_eq!(catalog.outer_radius(4), Some(25.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionCatalog {
    ring_width_mm: f64,
    thickness_mm: f64,
    density_g_cm3: f64,
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// Build a catalog of `ring_count` rings.
    ///
    /// Fails if `ring_count == 0` or any dimension is not strictly
    /// positive (NaN included).
    pub fn new(
        ring_count: u32,
        ring_width_mm: f64,
        thickness_mm: f64,
        density_g_cm3: f64,
    ) -> Result<Self, GeometryError> {
        if ring_count == 0 {
            return Err(GeometryError::NoRegions);
        }
        for (name, value) in [
            ("ring_width_mm", ring_width_mm),
            ("thickness_mm", thickness_mm),
            ("density_g_cm3", density_g_cm3),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::NonPositiveDimension { name, value });
            }
        }

        let density_kg_mm3 = density_g_cm3 * KG_PER_MM3_PER_G_PER_CM3;
        let regions = (0..ring_count)
            .map(|i| {
                let inner = f64::from(i) * ring_width_mm;
                let outer = f64::from(i + 1) * ring_width_mm;
                Region {
                    index: RegionIndex(i),
                    inner_radius_mm: inner,
                    outer_radius_mm: outer,
                    thickness_mm,
                    mass_kg: PI * (outer * outer - inner * inner) * thickness_mm * density_kg_mm3,
                }
            })
            .collect();

        Ok(Self {
            ring_width_mm,
            thickness_mm,
            density_g_cm3,
            regions,
        })
    }

    /// Number of rings.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether `index` names a ring in this catalog.
    pub fn contains(&self, index: RegionIndex) -> bool {
        index.as_usize() < self.regions.len()
    }

    /// Ring `index`, if it exists.
    pub fn region(&self, index: RegionIndex) -> Option<&Region> {
        self.regions.get(index.as_usize())
    }

    /// All rings, innermost first.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Inner radius of ring `i`, mm.
    pub fn inner_radius(&self, i: u32) -> Option<f64> {
        self.region(RegionIndex(i)).map(|r| r.inner_radius_mm)
    }

    /// Outer radius of ring `i`, mm.
    pub fn outer_radius(&self, i: u32) -> Option<f64> {
        self.region(RegionIndex(i)).map(|r| r.outer_radius_mm)
    }

    /// Mass of ring `i`, kg.
    pub fn mass(&self, i: u32) -> Option<f64> {
        self.region(RegionIndex(i)).map(|r| r.mass_kg)
    }

    /// Sum of all ring masses, kg.
    pub fn total_mass(&self) -> f64 {
        self.regions.iter().map(|r| r.mass_kg).sum()
    }

    /// Ring containing radial distance `r` (mm), if any.
    pub fn locate(&self, r: f64) -> Option<RegionIndex> {
        if r.is_nan() || r < 0.0 {
            return None;
        }
        let i = (r / self.ring_width_mm).floor() as usize;
        self.regions.get(i).map(|region| region.index)
    }

    /// Radial width of every ring, mm.
    pub fn ring_width_mm(&self) -> f64 {
        self.ring_width_mm
    }

    /// Axial thickness of the water, mm.
    pub fn thickness_mm(&self) -> f64 {
        self.thickness_mm
    }

    /// Water density, g/cm³.
    pub fn density_g_cm3(&self) -> f64 {
        self.density_g_cm3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ring_zero_mass() {
        // π · 5² · 5 mm³ · 1e-6 kg/mm³
        let catalog = RegionCatalog::new(5, 5.0, 5.0, 1.0).unwrap();
        let expected = PI * 25.0 * 5.0 * 1e-6;
        assert!((catalog.mass(0).unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn zero_rings_rejected() {
        match RegionCatalog::new(0, 5.0, 5.0, 1.0) {
            Err(GeometryError::NoRegions) => {}
            other => panic!("expected NoRegions, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_width_rejected() {
        match RegionCatalog::new(5, 0.0, 5.0, 1.0) {
            Err(GeometryError::NonPositiveDimension { name, .. }) => {
                assert_eq!(name, "ring_width_mm");
            }
            other => panic!("expected NonPositiveDimension, got {other:?}"),
        }
    }

    #[test]
    fn nan_density_rejected() {
        match RegionCatalog::new(5, 5.0, 5.0, f64::NAN) {
            Err(GeometryError::NonPositiveDimension { name, .. }) => {
                assert_eq!(name, "density_g_cm3");
            }
            other => panic!("expected NonPositiveDimension, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let catalog = RegionCatalog::new(3, 2.0, 1.0, 1.0).unwrap();
        assert_eq!(catalog.mass(3), None);
        assert_eq!(catalog.inner_radius(99), None);
        assert!(!catalog.contains(RegionIndex(3)));
        assert!(catalog.contains(RegionIndex(2)));
    }

    #[test]
    fn locate_maps_radius_to_ring() {
        let catalog = RegionCatalog::new(5, 5.0, 5.0, 1.0).unwrap();
        assert_eq!(catalog.locate(0.0), Some(RegionIndex(0)));
        assert_eq!(catalog.locate(4.999), Some(RegionIndex(0)));
        assert_eq!(catalog.locate(5.0), Some(RegionIndex(1)));
        assert_eq!(catalog.locate(24.9), Some(RegionIndex(4)));
        assert_eq!(catalog.locate(25.0), None);
        assert_eq!(catalog.locate(-1.0), None);
    }
}
