//! Raspberry Pi GPIO adapter.
//!
//! Claims one BCM line through `rppal` and wraps it in the generic
//! [`ContactSwitch`] driver.  `rppal`'s input pin implements the
//! `embedded-hal` 1.0 `InputPin` trait (feature `hal`), so nothing in the
//! driver is Pi-specific.
//!
//! Built only with the `rpi` feature; host tests use scripted pins.

use log::info;
use rppal::gpio::{Gpio, InputPin};

use crate::app::ports::SignalError;
use crate::config::MonitorConfig;
use crate::drivers::contact_switch::ContactSwitch;

/// Contact switch on a Raspberry Pi header pin.
pub type PiContactSwitch = ContactSwitch<InputPin>;

/// Open the configured pin as a floating input (internal pulls disabled;
/// the freezer contact circuit provides the bias).
pub fn open_contact(config: &MonitorConfig) -> Result<PiContactSwitch, SignalError> {
    let gpio = Gpio::new().map_err(|e| SignalError::Unavailable(e.to_string()))?;
    let pin = gpio
        .get(config.pin)
        .map_err(|e| SignalError::Unavailable(format!("BCM {}: {}", config.pin, e)))?
        .into_input();
    info!(
        "GPIO: BCM {} as input (active_high={}, debounce={})",
        config.pin, config.active_high, config.debounce_samples
    );
    Ok(ContactSwitch::new(
        pin,
        config.active_high,
        config.debounce_samples,
    ))
}
