//! A [`DiagnosticSink`] that renders records as `tracing` events.

use ringdose_core::{Diagnostic, DiagnosticSink, EventId};
use tracing::{debug, info, warn};

use crate::config::DiagnosticsConfig;

/// Forwards diagnostics to the `tracing` subscriber of the process.
///
/// Per-event detail is rate-limited: only the first
/// [`verbose_events`](DiagnosticsConfig::verbose_events) events and then
/// every [`verbose_every`](DiagnosticsConfig::verbose_every)-th event are
/// verbose. Warnings and run-level records are always forwarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink {
    limits: DiagnosticsConfig,
}

impl TracingSink {
    /// A sink with the given rate limits.
    pub fn new(limits: DiagnosticsConfig) -> Self {
        Self { limits }
    }

    /// The configured limits.
    pub fn limits(&self) -> DiagnosticsConfig {
        self.limits
    }
}

impl DiagnosticSink for TracingSink {
    fn is_verbose(&self, event: EventId) -> bool {
        let DiagnosticsConfig {
            verbose_events,
            verbose_every,
        } = self.limits;
        event.0 < verbose_events || (verbose_every > 0 && event.0 % verbose_every == 0)
    }

    fn emit(&mut self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::PrimariesGenerated {
                event,
                energies_kev,
            } => {
                info!(%event, count = energies_kev.len(), ?energies_kev, "primaries generated");
            }
            Diagnostic::RegionDeposit {
                event,
                region,
                energy_kev,
            } => {
                debug!(%event, %region, energy_kev, "ring deposit");
            }
            Diagnostic::PlaneCrossing {
                event,
                track,
                boundary,
                energy_kev,
            } => {
                debug!(%event, %track, %boundary, energy_kev, "boundary crossing");
            }
            Diagnostic::RegionIndexRejected {
                event,
                region,
                region_count,
            } => {
                warn!(%event, %region, region_count, "ring index out of range, deposit dropped");
            }
            Diagnostic::UnresolvedFate { event, track, fate } => {
                info!(%event, %track, fate = fate.label(), "primary fate unresolved");
            }
            Diagnostic::EventSummary {
                event,
                primaries,
                transmitted,
                absorbed,
                water_deposit_kev,
            } => {
                info!(
                    %event,
                    primaries,
                    transmitted,
                    absorbed,
                    water_deposit_kev,
                    "event finished"
                );
            }
            Diagnostic::EventDiscarded { event, reason } => {
                warn!(%event, reason = reason.as_str(), "event discarded");
            }
            Diagnostic::RunFinished { events, primaries } => {
                info!(events, primaries, "run finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_ten_then_every_ten_thousand() {
        let sink = TracingSink::default();
        assert!(sink.is_verbose(EventId(0)));
        assert!(sink.is_verbose(EventId(9)));
        assert!(!sink.is_verbose(EventId(10)));
        assert!(!sink.is_verbose(EventId(9_999)));
        assert!(sink.is_verbose(EventId(10_000)));
        assert!(sink.is_verbose(EventId(30_000)));
        assert!(!sink.is_verbose(EventId(30_001)));
    }

    #[test]
    fn zero_period_disables_periodic_detail() {
        let sink = TracingSink::new(DiagnosticsConfig {
            verbose_events: 2,
            verbose_every: 0,
        });
        assert!(sink.is_verbose(EventId(1)));
        assert!(!sink.is_verbose(EventId(2)));
        assert!(!sink.is_verbose(EventId(1_000_000)));
    }

    #[test]
    fn emitting_without_subscriber_is_harmless() {
        let mut sink = TracingSink::default();
        sink.emit(&Diagnostic::EventDiscarded {
            event: EventId(4),
            reason: "transport failed".to_string(),
        });
        sink.emit(&Diagnostic::RunFinished {
            events: 1,
            primaries: 2,
        });
    }
}
