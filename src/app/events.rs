//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  The log
//! adapter renders them; tests record them.

use crate::fsm::{SignalState, Transition};

/// Which recipient list a message was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The record's primary recipients.
    Primary,
    /// The record's backup recipients, after the primary send failed.
    Backup,
    /// The configured fallback contact, when no record was resolved.
    Fallback,
}

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Monitoring started with the given initial contact state.
    Started { address: String, initial: SignalState },

    /// An edge was detected.
    StateChanged(Transition),

    /// The contact could not be sampled this cycle.
    ReadFailed(String),

    /// The directory lookup for this monitor failed.
    LookupFailed(String),

    /// A message was accepted by the transport.
    Delivered { route: Route, recipients: Vec<String> },

    /// The transport refused a message.
    DeliveryFailed { route: Route, reason: String },

    /// Every route for this event failed; nobody was told.
    Undelivered(Transition),

    /// A poll iteration panicked and was abandoned.
    IterationAborted(String),
}
