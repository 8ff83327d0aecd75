//! pumpctl library.
//!
//! Drives pump relays on a Raspberry Pi GPIO header for fixed durations and
//! reports one structured result per command.  Hardware access sits behind
//! the port traits in [`app::ports`]; the Raspberry Pi adapter is compiled
//! only with the `rpi` feature so everything else runs on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;

pub use error::{Error, Result};
