//! GPIO pin assignment and contact polarity for the monitor board.
//!
//! Single source of truth for the built-in defaults; [`MonitorConfig`]
//! starts from these and a config file may override them.
//!
//! [`MonitorConfig`]: crate::config::MonitorConfig

// ---------------------------------------------------------------------------
// Freezer alarm contact
// ---------------------------------------------------------------------------

/// BCM GPIO line wired to the freezer's remote alarm contact.
/// BCM 17 is physical header pin 11 on every 40-pin Raspberry Pi.
pub const ALARM_CONTACT_GPIO: u8 = 17;

/// Polarity of the alarm contact input.
/// `true` = a HIGH level means the contact is OPEN (alarm raised).
pub const ALARM_CONTACT_ACTIVE_HIGH: bool = true;

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Default interval between contact samples (10 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Consecutive agreeing raw reads required before a new level is reported.
/// 1 disables filtering.
pub const DEFAULT_DEBOUNCE_SAMPLES: u8 = 1;
