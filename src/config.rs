//! Monitor configuration.
//!
//! Every tunable of the monitor lives here.  The [`Default`] impl carries
//! the built-in constants; a JSON file given on the command line may
//! override any subset of them.  The value is loaded once at startup,
//! validated, and handed to the service by reference.

use std::fs;
use std::path::{Path, PathBuf};

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::pins;

/// Contact used whenever directory-driven addressing is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackContact {
    /// Recipients of directory-failure and startup-failure reports.
    pub recipients: Vec<String>,
    /// Sender address for those reports.
    pub from: String,
    /// Reply-To header for those reports.
    pub reply_to: String,
}

impl Default for FallbackContact {
    fn default() -> Self {
        Self {
            // Change before deploying.
            recipients: vec!["it@example.edu".to_string()],
            from: "freezer-monitor@example.edu".to_string(),
            reply_to: "it@example.edu".to_string(),
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port (25 for a plain campus relay, 587 for submission).
    pub port: u16,
    /// Per-connection timeout in seconds; bounds how long one send may
    /// block the poll loop.
    pub timeout_secs: u64,
    /// Upgrade the connection with STARTTLS.
    pub starttls: bool,
    /// Optional SMTP AUTH user name.
    pub username: Option<String>,
    /// Optional SMTP AUTH password.
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "mailhub.example.edu".to_string(),
            port: 25,
            timeout_secs: 30,
            starttls: false,
            username: None,
            password: None,
        }
    }
}

/// Core monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Input ---
    /// BCM GPIO line of the alarm contact.
    pub pin: u8,
    /// `true` = HIGH level reads as OPEN.
    pub active_high: bool,
    /// Consecutive agreeing reads before a level change is accepted.
    pub debounce_samples: u8,
    /// Sleep between samples (milliseconds).
    pub poll_interval_ms: u64,

    // --- Directory ---
    /// Path of the shared contact directory CSV.
    pub directory_path: PathBuf,
    /// Interface whose IPv4 address keys the directory lookup.
    pub interface: String,
    /// Explicit directory key; overrides `interface` when set.
    pub device_address: Option<String>,

    // --- Notification ---
    pub fallback: FallbackContact,
    pub smtp: SmtpConfig,
    /// Raise an alarm if the contact is already OPEN at startup.
    pub alert_on_startup_open: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pin: pins::ALARM_CONTACT_GPIO,
            active_high: pins::ALARM_CONTACT_ACTIVE_HIGH,
            debounce_samples: pins::DEFAULT_DEBOUNCE_SAMPLES,
            poll_interval_ms: pins::DEFAULT_POLL_INTERVAL_MS,

            directory_path: PathBuf::from("/etc/freezer-monitor/contacts.csv"),
            interface: "eth0".to_string(),
            device_address: None,

            fallback: FallbackContact::default(),
            smtp: SmtpConfig::default(),
            alert_on_startup_open: false,
        }
    }
}

/// Errors from loading or validating a [`MonitorConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for this schema.
    Parse(serde_json::Error),
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config unreadable: {}", e),
            Self::Parse(e) => write!(f, "config parse error: {}", e),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl MonitorConfig {
    /// Load a config file, filling absent fields with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.debounce_samples == 0 {
            return Err(ConfigError::ValidationFailed("debounce_samples must be >= 1"));
        }
        if self.fallback.recipients.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "fallback.recipients must list at least one address",
            ));
        }
        if self.fallback.from.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("fallback.from must be set"));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("smtp.host must be set"));
        }
        if self.smtp.username.is_some() != self.smtp.password.is_some() {
            return Err(ConfigError::ValidationFailed(
                "smtp.username and smtp.password must be set together",
            ));
        }
        if self.device_address.is_none() && self.interface.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "either device_address or interface must be set",
            ));
        }
        Ok(())
    }
}
