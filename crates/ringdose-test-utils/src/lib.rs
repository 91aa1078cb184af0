//! Test utilities and mock collaborators for ringdose development.
//!
//! - [`StepBuilder`] / [`OwnedStep`]: construct transport steps without a
//!   real engine.
//! - [`ScriptedTransport`]: a [`TransportEngine`] that replays steps
//!   produced by a script closure, optionally failing chosen events.
//! - [`MemorySink`]: a [`DiagnosticSink`] that keeps every record.
//! - [`fixtures`]: reference geometry, sources and canned step scripts.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use ringdose_core::{
    Diagnostic, DiagnosticSink, EventId, ParticleKind, PrimaryEmission, StepObserver, StepPoint,
    TrackId, TrackStatus, TransportEngine, TransportError, Vec3,
};

// ── Steps ───────────────────────────────────────────────────────

/// Owned counterpart of [`StepPoint`], for building scripts.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedStep {
    pub event: EventId,
    pub pre_volume: String,
    pub post_volume: Option<String>,
    pub track: TrackId,
    pub parent: TrackId,
    pub particle: ParticleKind,
    pub kinetic_energy_kev: f64,
    pub energy_deposit_kev: f64,
    pub position: Vec3,
    pub direction: Vec3,
    pub status: TrackStatus,
    pub creator_process: Option<String>,
}

impl OwnedStep {
    /// Borrow as a [`StepPoint`].
    pub fn as_step(&self) -> StepPoint<'_> {
        StepPoint {
            event: self.event,
            pre_volume: &self.pre_volume,
            post_volume: self.post_volume.as_deref(),
            track: self.track,
            parent: self.parent,
            particle: self.particle,
            kinetic_energy_kev: self.kinetic_energy_kev,
            energy_deposit_kev: self.energy_deposit_kev,
            position: self.position,
            direction: self.direction,
            status: self.status,
            creator_process: self.creator_process.as_deref(),
        }
    }
}

/// Fluent builder for [`OwnedStep`].
///
/// Defaults: event 0, pre-volume `"World"`, stays in the same volume,
/// moving towards +z, alive, no deposit.
#[derive(Clone, Debug)]
pub struct StepBuilder {
    step: OwnedStep,
}

impl StepBuilder {
    /// A step of primary gamma `track` with kinetic energy `energy_kev`.
    pub fn primary_gamma(track: u32, energy_kev: f64) -> Self {
        Self::particle(ParticleKind::Gamma, track, 0, energy_kev)
    }

    /// A step of an arbitrary particle.
    pub fn particle(kind: ParticleKind, track: u32, parent: u32, energy_kev: f64) -> Self {
        Self {
            step: OwnedStep {
                event: EventId(0),
                pre_volume: "World".to_string(),
                post_volume: Some("World".to_string()),
                track: TrackId(track),
                parent: TrackId(parent),
                particle: kind,
                kinetic_energy_kev: energy_kev,
                energy_deposit_kev: 0.0,
                position: Vec3::default(),
                direction: Vec3::new(0.0, 0.0, 1.0),
                status: TrackStatus::Alive,
                creator_process: None,
            },
        }
    }

    pub fn event(mut self, event: u64) -> Self {
        self.step.event = EventId(event);
        self
    }

    /// Start in `volume` and stay there.
    pub fn within(mut self, volume: &str) -> Self {
        self.step.pre_volume = volume.to_string();
        self.step.post_volume = Some(volume.to_string());
        self
    }

    /// Cross from `from` into `to`.
    pub fn crossing(mut self, from: &str, to: &str) -> Self {
        self.step.pre_volume = from.to_string();
        self.step.post_volume = Some(to.to_string());
        self
    }

    /// Leave the world from `from`.
    pub fn leaving_world(mut self, from: &str) -> Self {
        self.step.pre_volume = from.to_string();
        self.step.post_volume = None;
        self
    }

    pub fn deposit(mut self, energy_kev: f64) -> Self {
        self.step.energy_deposit_kev = energy_kev;
        self
    }

    /// Move towards −z.
    pub fn backward(mut self) -> Self {
        self.step.direction = Vec3::new(0.0, 0.0, -1.0);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.step.position = position;
        self
    }

    pub fn stopped(mut self) -> Self {
        self.step.status = TrackStatus::Stopped;
        self
    }

    pub fn process(mut self, name: &str) -> Self {
        self.step.creator_process = Some(name.to_string());
        self
    }

    pub fn build(self) -> OwnedStep {
        self.step
    }
}

/// Feed every step of `steps` to `observer`.
pub fn replay(steps: &[OwnedStep], observer: &mut dyn StepObserver) {
    for step in steps {
        observer.on_step(&step.as_step());
    }
}

// ── Scripted transport ──────────────────────────────────────────

type Script = Arc<dyn Fn(EventId, &[PrimaryEmission]) -> Vec<OwnedStep> + Send + Sync>;

/// [`TransportEngine`] that replays scripted steps.
///
/// The script is called once per event with the event's primaries. Every
/// produced step is stamped with the event id before delivery. For events
/// registered with [`fail_on`](Self::fail_on), all steps are delivered
/// and then an error is returned, so tests can check that partial state
/// is discarded.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Script,
    fail_on: HashSet<EventId>,
    events_seen: usize,
}

impl ScriptedTransport {
    pub fn new(
        script: impl Fn(EventId, &[PrimaryEmission]) -> Vec<OwnedStep> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Arc::new(script),
            fail_on: HashSet::new(),
            events_seen: 0,
        }
    }

    /// A transport that produces no steps at all.
    pub fn silent() -> Self {
        Self::new(|_, _| Vec::new())
    }

    /// Fail transport of `event` after delivering its steps.
    pub fn fail_on(mut self, event: u64) -> Self {
        self.fail_on.insert(EventId(event));
        self
    }

    /// Number of events handed to this transport.
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("fail_on", &self.fail_on)
            .field("events_seen", &self.events_seen)
            .finish_non_exhaustive()
    }
}

impl TransportEngine for ScriptedTransport {
    fn transport(
        &mut self,
        event: EventId,
        primaries: &[PrimaryEmission],
        observer: &mut dyn StepObserver,
    ) -> Result<(), TransportError> {
        self.events_seen += 1;
        for mut step in (self.script)(event, primaries) {
            step.event = event;
            observer.on_step(&step.as_step());
        }
        if self.fail_on.contains(&event) {
            return Err(TransportError::Failed {
                event,
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

// ── Diagnostics ─────────────────────────────────────────────────

/// [`DiagnosticSink`] that keeps every record in shared memory.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// run owns another.
#[derive(Clone, Debug)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
    verbose: bool,
}

impl MemorySink {
    /// A sink that asks for detail on every event.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            verbose: true,
        }
    }

    /// A sink that only receives warnings and run-level records.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            ..Self::new()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Number of records matching `pred`.
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.lock().iter().filter(|d| pred(d)).count()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for MemorySink {
    fn is_verbose(&self, _event: EventId) -> bool {
        self.verbose
    }

    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}
