//! Freezer alarm contact driver.
//!
//! ## Hardware
//!
//! Most -80 freezers expose a dry "remote alarm" relay contact.  One side
//! goes to a GPIO input, the other to 3.3 V or ground depending on the
//! wiring; [`active_high`](ContactSwitch::new) tells the driver which raw
//! level means OPEN.
//!
//! ## Debounce
//!
//! A relay can chatter for a few milliseconds when it flips.  The driver
//! reports a new level only after `debounce_samples` consecutive raw reads
//! agree.  With the default of 1 every raw change is reported at once and
//! filtering is left to the poll interval.
//!
//! Generic over [`embedded_hal::digital::InputPin`], so the same driver
//! runs on an `rppal` pin in production and a scripted pin in tests.

use embedded_hal::digital::{Error as _, InputPin};

use crate::app::ports::{SignalError, SignalPort};
use crate::fsm::SignalState;

/// Consecutive-sample debounce filter over raw levels.
#[derive(Debug, Clone)]
pub struct Debouncer {
    required: u8,
    stable: Option<bool>,
    candidate: bool,
    count: u8,
}

impl Debouncer {
    pub fn new(required: u8) -> Self {
        Self {
            required: required.max(1),
            stable: None,
            candidate: false,
            count: 0,
        }
    }

    /// Feed one raw level; returns the current debounced level.
    /// The very first sample is accepted as-is.
    pub fn feed(&mut self, raw: bool) -> bool {
        let Some(stable) = self.stable else {
            self.stable = Some(raw);
            return raw;
        };

        if raw == stable {
            self.count = 0;
            return stable;
        }

        if self.count > 0 && raw == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = raw;
            self.count = 1;
        }

        if self.count >= self.required {
            self.stable = Some(raw);
            self.count = 0;
            return raw;
        }
        stable
    }
}

/// Alarm contact on one GPIO input.
pub struct ContactSwitch<P> {
    pin: P,
    active_high: bool,
    debounce: Debouncer,
}

impl<P: InputPin> ContactSwitch<P> {
    pub fn new(pin: P, active_high: bool, debounce_samples: u8) -> Self {
        Self {
            pin,
            active_high,
            debounce: Debouncer::new(debounce_samples),
        }
    }
}

impl<P: InputPin> SignalPort for ContactSwitch<P> {
    fn read(&mut self) -> Result<SignalState, SignalError> {
        let raw = self
            .pin
            .is_high()
            .map_err(|e| SignalError::ReadFailed(format!("{:?}", e.kind())))?;
        let level = self.debounce.feed(raw);
        Ok(SignalState::from_level(level, self.active_high))
    }
}
