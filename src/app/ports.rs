//! Port traits: the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! The contact input, the contact directory and the mail transport are
//! driven adapters.  [`MonitorService`](super::service::MonitorService)
//! takes them as generic arguments at each call, so the decision logic
//! never touches GPIO, files or sockets directly.
//!
//! All port errors are typed; the service decides fallback behaviour,
//! adapters never retry on their own.

use core::fmt;

use crate::directory::{ContactRecord, DirectoryLoadError, RecordNotFoundError};
use crate::fsm::SignalState;

use super::alert::OutgoingMail;

// ───────────────────────────────────────────────────────────────
// Signal port (driven adapter: contact input → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the monitored digital input.
pub trait SignalPort {
    /// Sample the contact once.  Polarity and debouncing are the
    /// adapter's concern; the result is already OPEN/CLOSED.
    fn read(&mut self) -> Result<SignalState, SignalError>;
}

// ───────────────────────────────────────────────────────────────
// Directory port (driven adapter: contact file → domain)
// ───────────────────────────────────────────────────────────────

/// Resolves this monitor's address to its contact record.
///
/// Implementations may re-read their source on every call; edits to the
/// source must become visible without restarting the process.
pub trait DirectoryPort {
    fn lookup(&self, address: &str) -> Result<ContactRecord, LookupError>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → mail transport)
// ───────────────────────────────────────────────────────────────

/// Delivers one composed message.  Blocks until the transport accepts
/// or rejects it (bounded by the transport's own timeout).
pub trait NotifierPort {
    fn send(&mut self, mail: &OutgoingMail) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SignalPort::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The pin could not be read.
    ReadFailed(String),
    /// The pin could not be claimed or configured.
    Unavailable(String),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed(msg) => write!(f, "contact read failed: {}", msg),
            Self::Unavailable(msg) => write!(f, "contact input unavailable: {}", msg),
        }
    }
}

impl std::error::Error for SignalError {}

/// Errors from [`DirectoryPort::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The directory source could not be loaded.
    Load(DirectoryLoadError),
    /// The directory loaded but has no row for this monitor.
    NotFound(RecordNotFoundError),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "{}", e),
            Self::NotFound(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<DirectoryLoadError> for LookupError {
    fn from(e: DirectoryLoadError) -> Self {
        Self::Load(e)
    }
}

impl From<RecordNotFoundError> for LookupError {
    fn from(e: RecordNotFoundError) -> Self {
        Self::NotFound(e)
    }
}

/// Errors from [`NotifierPort::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Relay could not be reached or the connection dropped.
    Unreachable(String),
    /// Relay rejected our credentials.
    AuthRejected(String),
    /// Relay refused one or more recipients.
    RecipientRejected(String),
    /// An address could not be parsed into a mailbox.
    InvalidAddress(String),
    /// Any other negative reply.
    Rejected(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "mail relay unreachable: {}", msg),
            Self::AuthRejected(msg) => write!(f, "mail relay rejected credentials: {}", msg),
            Self::RecipientRejected(msg) => write!(f, "recipient rejected: {}", msg),
            Self::InvalidAddress(msg) => write!(f, "invalid address: {}", msg),
            Self::Rejected(msg) => write!(f, "mail rejected: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}
