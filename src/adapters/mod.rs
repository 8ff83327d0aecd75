//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements  | Connects to                  |
//! |----------------|-------------|------------------------------|
//! | `rppal_gpio`   | GpioPort    | Raspberry Pi GPIO chip (BCM) |
//! | `sim_gpio`     | GpioPort    | In-memory pin table          |
//! | `config_file`  | ConfigPort  | `data/pump-config.json`      |
//! | `delay`        | DelayNs     | `std::thread::sleep`         |

pub mod config_file;
pub mod delay;
#[cfg(feature = "rpi")]
pub mod rppal_gpio;
pub mod sim_gpio;
