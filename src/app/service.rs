//! Monitor service: the hexagonal core.
//!
//! [`MonitorService`] owns the edge detector and the fallback policy.
//! Every collaborator is injected per call through a port trait, so the
//! whole decision path runs against mocks in tests.
//!
//! ```text
//!  SignalPort ──▶ ┌─────────────────────────┐ ──▶ NotifierPort
//!                 │     MonitorService       │
//! DirectoryPort ─▶│ edge · lookup · fallback │ ──▶ EventSink
//!                 └─────────────────────────┘
//! ```
//!
//! Dispatch policy for one edge:
//!
//! 1. look up this monitor's record;
//! 2. record found: send to the primary list, and on a transport error
//!    send the same message once to the backup list;
//! 3. lookup failed: send a failure report to the configured fallback
//!    contact.
//!
//! A failure on the last route of a chain is reported through the
//! [`EventSink`] and the event is dropped.  The edge is never re-fired by a later poll.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use chrono::Local;
use log::{info, warn};

use crate::config::{FallbackContact, MonitorConfig};
use crate::fsm::{EdgeDetector, SignalState, StateId, Transition};

use super::alert::{AlertEvent, alert_mail, lookup_failure_mail};
use super::events::{AppEvent, Route};
use super::ports::{DirectoryPort, EventSink, NotifierPort, SignalError, SignalPort};

/// How an edge ended up being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Accepted for the record's primary recipients.
    Primary,
    /// Primary failed; accepted for the record's backup recipients.
    Backup,
    /// No record; failure report accepted for the fallback contact.
    Fallback,
    /// Every attempted route failed.
    Undelivered,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First successful sample; nothing to compare against yet.
    Seeded(SignalState),
    /// Sample equals the previous one.
    Steady,
    /// The contact could not be read; state left untouched.
    ReadFailed,
    /// An edge was detected and dispatched.
    Edge(Transition, Dispatch),
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService {
    address: String,
    fallback: FallbackContact,
    poll_interval: Duration,
    alert_on_startup_open: bool,
    detector: Option<EdgeDetector>,
    tick_count: u64,
}

impl MonitorService {
    /// Build the service for the monitor reachable at `address`.
    ///
    /// Does **not** sample the contact; call [`start`](Self::start) next.
    pub fn new(config: &MonitorConfig, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            fallback: config.fallback.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            alert_on_startup_open: config.alert_on_startup_open,
            detector: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the initial sample.  No alert is raised for it unless
    /// `alert_on_startup_open` is set and the contact is already OPEN.
    pub fn start(
        &mut self,
        signal: &mut impl SignalPort,
        directory: &impl DirectoryPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> Result<SignalState, SignalError> {
        let initial = signal.read()?;
        self.seed(initial, sink);

        if self.alert_on_startup_open && initial.is_alarm() {
            warn!("Contact already OPEN at startup, raising alarm");
            self.dispatch(Transition::into_state(initial), true, directory, notifier, sink);
        }
        Ok(initial)
    }

    /// Poll forever, sleeping `poll_interval` between samples.
    pub fn run(
        &mut self,
        signal: &mut impl SignalPort,
        directory: &impl DirectoryPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> ! {
        info!(
            "Polling every {} ms for monitor {}",
            self.poll_interval.as_millis(),
            self.address
        );
        loop {
            std::thread::sleep(self.poll_interval);
            self.poll_once(signal, directory, notifier, sink);
        }
    }

    /// One iteration of [`run`](Self::run): a [`tick`](Self::tick) with
    /// panics contained.
    ///
    /// Returns `None` when the iteration panicked; the panic is reported
    /// as [`AppEvent::IterationAborted`] and the service stays usable.
    pub fn poll_once(
        &mut self,
        signal: &mut impl SignalPort,
        directory: &impl DirectoryPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> Option<TickOutcome> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.tick(signal, directory, notifier, sink)
        }));
        match result {
            Ok(outcome) => Some(outcome),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                sink.emit(&AppEvent::IterationAborted(reason));
                None
            }
        }
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one poll cycle: sample → compare → dispatch on change.
    pub fn tick(
        &mut self,
        signal: &mut impl SignalPort,
        directory: &impl DirectoryPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;

        let sample = match signal.read() {
            Ok(s) => s,
            Err(e) => {
                sink.emit(&AppEvent::ReadFailed(e.to_string()));
                return TickOutcome::ReadFailed;
            }
        };

        if self.detector.is_none() {
            self.seed(sample, sink);
            return TickOutcome::Seeded(sample);
        }

        // The detector has already moved on when this returns, so a failed
        // dispatch below is never retried by the next poll.
        let edge = self.detector.as_mut().and_then(|d| d.observe(sample));
        match edge {
            None => TickOutcome::Steady,
            Some(transition) => {
                sink.emit(&AppEvent::StateChanged(transition));
                let outcome = self.dispatch(transition, false, directory, notifier, sink);
                TickOutcome::Edge(transition, outcome)
            }
        }
    }

    /// Resolve recipients for `transition` and send, falling back as needed.
    pub fn dispatch(
        &self,
        transition: Transition,
        at_startup: bool,
        directory: &impl DirectoryPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> Dispatch {
        let mut event = AlertEvent::new(transition, Local::now());
        event.at_startup = at_startup;

        let record = match directory.lookup(&self.address) {
            Ok(record) => {
                event.record = Some(record.clone());
                record
            }
            Err(e) => {
                sink.emit(&AppEvent::LookupFailed(e.to_string()));
                let mail = lookup_failure_mail(&event, &self.address, &e, &self.fallback);
                return match notifier.send(&mail) {
                    Ok(()) => {
                        sink.emit(&AppEvent::Delivered {
                            route: Route::Fallback,
                            recipients: mail.to,
                        });
                        Dispatch::Fallback
                    }
                    Err(send_err) => {
                        sink.emit(&AppEvent::DeliveryFailed {
                            route: Route::Fallback,
                            reason: send_err.to_string(),
                        });
                        sink.emit(&AppEvent::Undelivered(transition));
                        Dispatch::Undelivered
                    }
                };
            }
        };

        let primary = alert_mail(&event, &record, &record.primary_emails);
        let primary_err = match notifier.send(&primary) {
            Ok(()) => {
                sink.emit(&AppEvent::Delivered {
                    route: Route::Primary,
                    recipients: primary.to,
                });
                return Dispatch::Primary;
            }
            Err(e) => e,
        };
        sink.emit(&AppEvent::DeliveryFailed {
            route: Route::Primary,
            reason: primary_err.to_string(),
        });

        let backup = alert_mail(&event, &record, &record.backup_emails);
        match notifier.send(&backup) {
            Ok(()) => {
                sink.emit(&AppEvent::Delivered {
                    route: Route::Backup,
                    recipients: backup.to,
                });
                Dispatch::Backup
            }
            Err(e) => {
                sink.emit(&AppEvent::DeliveryFailed {
                    route: Route::Backup,
                    reason: e.to_string(),
                });
                sink.emit(&AppEvent::Undelivered(transition));
                Dispatch::Undelivered
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last sampled contact state, once seeded.
    pub fn last_state(&self) -> Option<SignalState> {
        self.detector.as_ref().map(EdgeDetector::last)
    }

    /// Edge the detector is waiting for, once seeded.
    pub fn state(&self) -> Option<StateId> {
        self.detector.as_ref().map(EdgeDetector::state)
    }

    /// Poll cycles executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn seed(&mut self, initial: SignalState, sink: &mut impl EventSink) {
        self.detector = Some(EdgeDetector::new(initial));
        sink.emit(&AppEvent::Started {
            address: self.address.clone(),
            initial,
        });
    }
}
