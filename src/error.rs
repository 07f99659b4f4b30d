//! Unified error type for the monitor.
//!
//! Every port error converts into [`Error`], which keeps the startup path
//! in [`app::startup`](crate::app::startup) uniform.  Inside the poll
//! loop the service handles each port error itself and never lets one
//! escape.

use core::fmt;

use crate::app::ports::{LookupError, SignalError, TransportError};
use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The contact input failed.
    Signal(SignalError),
    /// The contact directory could not be used.
    Directory(LookupError),
    /// The mail transport failed.
    Transport(TransportError),
    /// This monitor's own network address could not be resolved.
    Address(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Signal(e) => write!(f, "signal: {e}"),
            Self::Directory(e) => write!(f, "directory: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Address(msg) => write!(f, "address: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SignalError> for Error {
    fn from(e: SignalError) -> Self {
        Self::Signal(e)
    }
}

impl From<LookupError> for Error {
    fn from(e: LookupError) -> Self {
        Self::Directory(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
