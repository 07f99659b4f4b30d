//! Startup sequencing for the binary.
//!
//! Every step returns the crate [`Error`].  In [`Mode::Monitor`] a step
//! that leaves the freezer unwatched is reported to the fallback contact
//! before the error is handed back; [`Mode::Check`] only ever prints, so
//! it never mails anyone.

use std::path::Path;

use chrono::Local;
use log::{error, info};

use crate::config::{FallbackContact, MonitorConfig};
use crate::directory::ContactRecord;
use crate::error::{Error, Result};

use super::alert::startup_failure_mail;
use super::ports::{DirectoryPort, NotifierPort};

/// What the process was started to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Watch the contact until killed.
    Monitor,
    /// Resolve and print this monitor's directory record, then exit.
    Check,
}

/// Config from `path`, or the built-in defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(MonitorConfig::default());
    };
    let config = MonitorConfig::from_file(path)?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Mail a startup failure to the fallback contact (best effort) and hand
/// the error back for the exit path.
pub fn report_failure(
    fallback: &FallbackContact,
    notifier: &mut impl NotifierPort,
    address: Option<&str>,
    err: Error,
) -> Error {
    let mail = startup_failure_mail(address, &err.to_string(), Local::now(), fallback);
    match notifier.send(&mail) {
        Ok(()) => info!("Startup failure reported to {}", mail.to.join(", ")),
        Err(e) => error!("Could not report startup failure: {}", e),
    }
    err
}

/// Resolve this monitor's directory key with `resolve`.
///
/// A failure is reported to the fallback contact in [`Mode::Monitor`]
/// only.
pub fn resolve_address(
    mode: Mode,
    config: &MonitorConfig,
    notifier: &mut impl NotifierPort,
    resolve: impl FnOnce(&MonitorConfig) -> Result<String>,
) -> Result<String> {
    match (resolve(config), mode) {
        (Ok(address), _) => {
            info!("Monitor address: {}", address);
            Ok(address)
        }
        (Err(e), Mode::Check) => Err(e),
        (Err(e), Mode::Monitor) => Err(report_failure(&config.fallback, notifier, None, e)),
    }
}

/// Look up `address` once, for `--check-directory`.
pub fn check_directory(directory: &impl DirectoryPort, address: &str) -> Result<ContactRecord> {
    Ok(directory.lookup(address)?)
}
