//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged line through the `log` facade.  The binary routes `log` to
//! stderr, where the service manager's journal picks it up.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { address, initial } => {
                info!("START | address={} | contact={}", address, initial);
            }
            AppEvent::StateChanged(t) => {
                info!("STATE | {}", t);
            }
            AppEvent::ReadFailed(reason) => {
                warn!("INPUT | read failed: {}", reason);
            }
            AppEvent::LookupFailed(reason) => {
                error!("DIR   | lookup failed: {}", reason);
            }
            AppEvent::Delivered { route, recipients } => {
                info!("MAIL  | {:?} delivered to {}", route, recipients.join(", "));
            }
            AppEvent::DeliveryFailed { route, reason } => {
                warn!("MAIL  | {:?} failed: {}", route, reason);
            }
            AppEvent::Undelivered(t) => {
                error!("MAIL  | nobody notified of {}", t);
            }
            AppEvent::IterationAborted(reason) => {
                error!("FAULT | poll iteration aborted: {}", reason);
            }
        }
    }
}
