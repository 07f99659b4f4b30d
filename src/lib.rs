//! Freezer monitor library.
//!
//! Watches one alarm contact on a single-board computer and emails the
//! freezer's contacts when it opens or closes.  Exposes the pure-logic
//! modules for integration testing; the Raspberry Pi GPIO adapter is
//! gated behind the `rpi` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod directory;
pub mod error;
pub mod fsm;
pub mod pins;

pub mod adapters;
pub mod drivers;
