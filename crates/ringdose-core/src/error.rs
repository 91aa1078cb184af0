//! Errors crossing the transport-engine boundary.

use crate::id::EventId;
use std::error::Error;
use std::fmt;

/// Errors reported by a [`TransportEngine`](crate::TransportEngine).
///
/// Any of these discards the event in flight: the tracker guard is dropped
/// unfinished and no run-level aggregate is touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The engine failed while transporting the event's primaries.
    Failed {
        /// The event being transported.
        event: EventId,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The engine aborted the event on its own (user abort, watchdog).
    Aborted {
        /// The event being transported.
        event: EventId,
    },
}

impl TransportError {
    /// The event the error belongs to.
    pub fn event(&self) -> EventId {
        match self {
            Self::Failed { event, .. } | Self::Aborted { event } => *event,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { event, reason } => {
                write!(f, "transport of event {event} failed: {reason}")
            }
            Self::Aborted { event } => write!(f, "transport of event {event} aborted"),
        }
    }
}

impl Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_event() {
        let err = TransportError::Failed {
            event: EventId(9),
            reason: "navigator lost".into(),
        };
        assert_eq!(err.to_string(), "transport of event 9 failed: navigator lost");
        assert_eq!(err.event(), EventId(9));
        assert_eq!(
            TransportError::Aborted { event: EventId(2) }.to_string(),
            "transport of event 2 aborted"
        );
    }
}
