//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no GPIO, mail
//! relay or network interface required.

mod directory_tests;
mod scenario_tests;
