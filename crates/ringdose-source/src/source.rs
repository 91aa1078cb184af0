//! The decay source: spectrum + cone + activity.

use crate::cone::ConeSampler;
use crate::error::SourceError;
use crate::spectrum::Spectrum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ringdose_core::{EventId, EventPrimaries, LineIndex, PrimaryEmission, TrackId, Vec3};

/// A radioactive point source emitting into a restricted cone.
///
/// Constructed via [`DecaySource::builder`].
#[derive(Clone, Debug)]
pub struct DecaySource {
    spectrum: Spectrum,
    cone: ConeSampler,
    activity_bq: f64,
    position: Vec3,
}

/// Builder for [`DecaySource`].
///
/// Required field: `spectrum`.
#[derive(Clone, Debug)]
pub struct DecaySourceBuilder {
    spectrum: Option<Spectrum>,
    cone_half_angle_deg: f64,
    activity_bq: f64,
    position: Vec3,
}

impl DecaySource {
    /// Create a new builder.
    pub fn builder() -> DecaySourceBuilder {
        DecaySourceBuilder {
            spectrum: None,
            cone_half_angle_deg: 180.0,
            activity_bq: 0.0,
            position: Vec3::default(),
        }
    }

    /// The per-event RNG: ChaCha8 keyed by `seed`, on stream `event`.
    ///
    /// Every `(seed, event)` pair gets its own stream, so any partition of
    /// the event range across workers generates the same primaries and
    /// runs with different seeds share no events.
    pub fn event_rng(seed: u64, event: EventId) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(event.0);
        rng
    }

    /// Generate the primaries of one decay.
    ///
    /// One Bernoulli trial per line, in spectrum order; each success gets
    /// its own cone direction. Primaries are numbered
    /// [`TrackId::for_primary`] in the order they are returned. May be
    /// empty.
    pub fn generate_event<R: Rng + ?Sized>(&self, rng: &mut R) -> EventPrimaries {
        let mut out = EventPrimaries::new();
        for (k, line) in self.spectrum.lines().iter().enumerate() {
            let u: f64 = rng.random();
            if u < line.probability {
                let (theta, phi, _) = self.cone.sample(rng);
                out.push(PrimaryEmission::new(
                    TrackId::for_primary(out.len()),
                    LineIndex(k as u32),
                    line.energy_kev,
                    theta,
                    phi,
                ));
            }
        }
        out
    }

    /// The emission spectrum.
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// The direction sampler.
    pub fn cone(&self) -> &ConeSampler {
        &self.cone
    }

    /// Source activity, Bq (isotropic decays per second).
    pub fn activity_bq(&self) -> f64 {
        self.activity_bq
    }

    /// Source position, mm.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Expected primaries per decay.
    pub fn mean_primaries_per_decay(&self) -> f64 {
        self.spectrum.mean_per_decay()
    }
}

impl DecaySourceBuilder {
    /// Set the emission spectrum.
    pub fn spectrum(mut self, spectrum: Spectrum) -> Self {
        self.spectrum = Some(spectrum);
        self
    }

    /// Set the cone half-angle in degrees (default: 180, isotropic).
    pub fn cone_half_angle_deg(mut self, deg: f64) -> Self {
        self.cone_half_angle_deg = deg;
        self
    }

    /// Set the activity in Bq (default: 0). Must be finite and >= 0.
    pub fn activity_bq(mut self, bq: f64) -> Self {
        self.activity_bq = bq;
        self
    }

    /// Set the source position in mm (default: origin).
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Build the source, validating all configuration.
    ///
    /// # Errors
    ///
    /// - [`SourceError::MissingSpectrum`] if no spectrum was set
    /// - [`SourceError::InvalidConeAngle`] if the half-angle is outside `(0, 180]` degrees
    /// - [`SourceError::InvalidActivity`] if the activity is negative or not finite
    pub fn build(self) -> Result<DecaySource, SourceError> {
        let spectrum = self.spectrum.ok_or(SourceError::MissingSpectrum)?;
        let cone = ConeSampler::from_degrees(self.cone_half_angle_deg)?;
        if !(self.activity_bq.is_finite() && self.activity_bq >= 0.0) {
            return Err(SourceError::InvalidActivity {
                activity_bq: self.activity_bq,
            });
        }
        Ok(DecaySource {
            spectrum,
            cone,
            activity_bq: self.activity_bq,
            position: self.position,
        })
    }
}
