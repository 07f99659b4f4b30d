//! Hardware drivers, generic over `embedded-hal` traits.

pub mod contact_switch;
