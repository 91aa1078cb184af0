//! Property tests: the ring catalog partitions the disc and conserves mass.

use proptest::prelude::*;
use ringdose_geometry::RegionCatalog;
use std::f64::consts::PI;

proptest! {
    #[test]
    fn rings_are_contiguous(
        n in 1u32..32,
        width in 0.01f64..100.0,
        thickness in 0.01f64..50.0,
        density in 0.01f64..20.0,
    ) {
        let catalog = RegionCatalog::new(n, width, thickness, density).unwrap();
        prop_assert_eq!(catalog.inner_radius(0), Some(0.0));
        for i in 0..n - 1 {
            prop_assert_eq!(catalog.outer_radius(i), catalog.inner_radius(i + 1));
        }
    }

    #[test]
    fn ring_masses_sum_to_disc_mass(
        n in 1u32..32,
        width in 0.01f64..100.0,
        thickness in 0.01f64..50.0,
        density in 0.01f64..20.0,
    ) {
        let catalog = RegionCatalog::new(n, width, thickness, density).unwrap();
        let r = catalog.outer_radius(n - 1).unwrap();
        let disc = PI * r * r * thickness * density * 1e-6;
        let total = catalog.total_mass();
        prop_assert!(((total - disc) / disc).abs() < 1e-9, "total {total} vs disc {disc}");
    }

    #[test]
    fn every_radius_inside_the_disc_has_exactly_one_ring(
        n in 1u32..16,
        width in 0.1f64..10.0,
        frac in 0.0f64..0.999,
    ) {
        let catalog = RegionCatalog::new(n, width, 1.0, 1.0).unwrap();
        let r = frac * f64::from(n) * width;
        let owners = catalog.regions().iter().filter(|g| g.contains_radius(r)).count();
        prop_assert_eq!(owners, 1);
    }
}
