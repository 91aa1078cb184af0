//! Traits at the boundary with the external transport engine.
//!
//! The transport engine is a black box: it receives an event's primaries,
//! transports them through the geometry, and calls back once per step.
//! Adapters wrapping a concrete engine implement [`TransportEngine`]; the
//! per-event tracker implements [`StepObserver`].

use crate::error::TransportError;
use crate::id::EventId;
use crate::primary::PrimaryEmission;
use crate::step::StepPoint;

/// Receives transport steps, in whatever order the engine produces them.
pub trait StepObserver {
    /// Called once per step. Must not fail: unknown tracks and foreign
    /// volumes are ignored by the implementation.
    fn on_step(&mut self, step: &StepPoint<'_>);
}

/// A particle-transport engine driven one event at a time.
///
/// # Contract
///
/// - Primaries are injected in slice order and numbered
///   [`TrackId::for_primary`](crate::TrackId::for_primary) (`1..=n`).
/// - Every step is reported synchronously through `observer` before
///   `transport` returns.
/// - `Send` so that batched runs can move one engine per worker thread.
pub trait TransportEngine: Send {
    /// Transport `primaries` for `event`, reporting each step to `observer`.
    fn transport(
        &mut self,
        event: EventId,
        primaries: &[PrimaryEmission],
        observer: &mut dyn StepObserver,
    ) -> Result<(), TransportError>;
}

impl<T: TransportEngine + ?Sized> TransportEngine for Box<T> {
    fn transport(
        &mut self,
        event: EventId,
        primaries: &[PrimaryEmission],
        observer: &mut dyn StepObserver,
    ) -> Result<(), TransportError> {
        (**self).transport(event, primaries, observer)
    }
}
