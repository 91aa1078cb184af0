//! Unit conventions and conversion constants.
//!
//! The pipeline works in keV, mm, kg, Bq and seconds. Densities enter the
//! API in g/cm³ because that is how material tables quote them.

/// Joules per keV.
pub const JOULE_PER_KEV: f64 = 1.602176634e-16;

/// kg/mm³ per g/cm³.
pub const KG_PER_MM3_PER_G_PER_CM3: f64 = 1.0e-6;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// nGy per Gy.
pub const NANOGRAY_PER_GRAY: f64 = 1.0e9;

/// Convert an energy in keV to joules.
#[inline]
pub fn kev_to_joule(kev: f64) -> f64 {
    kev * JOULE_PER_KEV
}

/// Convert a dose rate in Gy/s to nGy/h.
#[inline]
pub fn gray_per_second_to_nanogray_per_hour(rate: f64) -> f64 {
    rate * SECONDS_PER_HOUR * NANOGRAY_PER_GRAY
}
