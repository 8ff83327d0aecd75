//! Application core: pin sequencing and command handling, zero direct I/O.
//!
//! All interaction with hardware and the configuration file happens through
//! the **port traits** defined in [`ports`], keeping this layer fully
//! testable without a Raspberry Pi.

pub mod commands;
pub mod ports;
pub mod report;
pub mod service;
