//! Alert values and message composition.
//!
//! An [`AlertEvent`] is created the moment an edge is detected, turned
//! into one or more [`OutgoingMail`]s, and dropped.  Nothing here is
//! persisted.

use chrono::{DateTime, Local};

use crate::config::FallbackContact;
use crate::directory::ContactRecord;
use crate::fsm::Transition;

use super::ports::LookupError;

/// Timestamp layout used in every message body, e.g. `Tue Oct 20 14:03:11 2026`.
const TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// A detected transition on its way to the notifier.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub transition: Transition,
    pub detected_at: DateTime<Local>,
    /// Directory record, when the lookup succeeded.
    pub record: Option<ContactRecord>,
    /// Raised for the initial sample rather than an observed edge.
    pub at_startup: bool,
}

impl AlertEvent {
    pub fn new(transition: Transition, detected_at: DateTime<Local>) -> Self {
        Self {
            transition,
            detected_at,
            record: None,
            at_startup: false,
        }
    }

    fn time(&self) -> String {
        self.detected_at.format(TIME_FORMAT).to_string()
    }
}

/// A fully addressed message ready for a [`NotifierPort`](super::ports::NotifierPort).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub reply_to: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

// ───────────────────────────────────────────────────────────────
// Alarm / all-clear
// ───────────────────────────────────────────────────────────────

/// Alarm or all-clear for `record`, addressed to `to`.
///
/// Used verbatim for both the primary and the backup recipient list.
pub fn alert_mail(event: &AlertEvent, record: &ContactRecord, to: &[String]) -> OutgoingMail {
    let location = &record.location;
    let (subject, mut body) = if event.transition.is_alarm() {
        (
            format!("ALERT: Problem with -80 freezer in {location}"),
            format!(
                "A potential problem has been detected with the -80 freezer located in room: {location}\n\
                 Contact state: {}\n\
                 This event was detected at: {}",
                event.transition,
                event.time()
            ),
        )
    } else {
        (
            format!("Re: ALERT: Problem with -80 freezer in {location}"),
            format!(
                "The problem detected with the -80 freezer located in room: {location} appears to have been resolved.\n\
                 Contact state: {}\n\
                 This resolution was detected at: {}\n\
                 Please check this freezer to confirm that it is now working properly.",
                event.transition,
                event.time()
            ),
        )
    };
    if event.at_startup {
        body.push_str("\n\nThe contact was already open when the monitor started.");
    }

    OutgoingMail {
        from: record.from_address.clone(),
        reply_to: record.reply_to.clone(),
        to: to.to_vec(),
        subject,
        body,
    }
}

// ───────────────────────────────────────────────────────────────
// Directory failure
// ───────────────────────────────────────────────────────────────

/// Message to the fallback contact when no record could be resolved.
pub fn lookup_failure_mail(
    event: &AlertEvent,
    address: &str,
    reason: &LookupError,
    fallback: &FallbackContact,
) -> OutgoingMail {
    let mut body = format!(
        "Failed to resolve contact information for the freezer monitor at address: {address}\n\
         Reason: {reason}\n\
         Contact state: {}\n\
         Event time: {}\n\n\
         Please verify the contents and structure of the contact directory as soon as possible. \
         Alert messages for this freezer cannot be routed until this error is resolved.",
        event.transition,
        event.time()
    );
    if event.transition.is_alarm() {
        body.push_str(
            "\n\nThis event indicates a potential problem with the freezer connected to this monitor. \
             Please check the freezer or notify the appropriate lab members immediately.",
        );
    } else {
        body.push_str(
            "\n\nThis event indicates the resolution of a potential problem with the freezer connected to this monitor. \
             Please notify the appropriate lab members to confirm that the freezer is now working properly.",
        );
    }

    OutgoingMail {
        from: fallback.from.clone(),
        reply_to: fallback.reply_to.clone(),
        to: fallback.recipients.clone(),
        subject: format!("Freezer directory error for monitor at {address}"),
        body,
    }
}

// ───────────────────────────────────────────────────────────────
// Startup failure
// ───────────────────────────────────────────────────────────────

/// Message to the fallback contact when the monitor cannot start.
pub fn startup_failure_mail(
    address: Option<&str>,
    reason: &str,
    at: DateTime<Local>,
    fallback: &FallbackContact,
) -> OutgoingMail {
    let address = address.unwrap_or("unknown");
    OutgoingMail {
        from: fallback.from.clone(),
        reply_to: fallback.reply_to.clone(),
        to: fallback.recipients.clone(),
        subject: "Freezer monitor failed to start".to_string(),
        body: format!(
            "The freezer monitor at address: {address} failed to start and is NOT watching its freezer.\n\
             Reason: {reason}\n\
             Time: {}",
            at.format(TIME_FORMAT)
        ),
    }
}
