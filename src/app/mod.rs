//! Application core: pure decision logic, zero I/O.
//!
//! Edge detection, contact resolution and the primary → backup →
//! fallback delivery policy.  All interaction with GPIO, the directory
//! file and the mail relay happens through the **port traits** in
//! [`ports`], keeping this layer testable without hardware.

pub mod alert;
pub mod events;
pub mod ports;
pub mod service;
pub mod startup;
