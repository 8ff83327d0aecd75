//! Port traits: the hexagonal boundary between the pin controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PinController (domain)
//! ```
//!
//! Driven adapters (GPIO chip, configuration file) implement these traits.
//! The [`PinController`](super::service::PinController) consumes them via
//! generics, so the domain core never touches hardware directly.

use embedded_hal::digital::PinState;

use crate::config::PumpConfig;
use crate::pins::Pin;

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain → pin hardware)
// ───────────────────────────────────────────────────────────────

/// Digital output capability of the GPIO chip.
///
/// The numbering scheme (BCM) is selected once when the adapter is opened.
/// Implementations own the pin table exclusively for their lifetime.
pub trait GpioPort {
    /// Claim `pin` as a digital output.  Calling it again for a pin that is
    /// already an output is a no-op.
    fn configure_output(&mut self, pin: Pin) -> Result<(), GpioError>;

    /// Drive `pin` to `level` (`Low` = pump off, `High` = pump on).
    fn write(&mut self, pin: Pin, level: PinState) -> Result<(), GpioError>;

    /// Return every claimed pin to its default, unclaimed state.
    /// Must succeed when called repeatedly.
    fn release_all(&mut self) -> Result<(), GpioError>;
}

impl<G: GpioPort + ?Sized> GpioPort for &mut G {
    fn configure_output(&mut self, pin: Pin) -> Result<(), GpioError> {
        (**self).configure_output(pin)
    }

    fn write(&mut self, pin: Pin, level: PinState) -> Result<(), GpioError> {
        (**self).write(pin, level)
    }

    fn release_all(&mut self) -> Result<(), GpioError> {
        (**self).release_all()
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← pump config)
// ───────────────────────────────────────────────────────────────

/// Source of the pump configuration records.
pub trait ConfigPort {
    /// Load every pump record in file order.
    ///
    /// Returns `Ok(None)` when no configuration exists; that is not an
    /// error, callers fall back to the default pin range.
    fn load(&self) -> Result<Option<Vec<PumpConfig>>, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`GpioPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The line does not exist or could not be claimed.
    Unavailable { pin: Pin, reason: String },
    /// A level was written to a pin that was never configured as an output.
    NotConfigured(Pin),
    /// The chip rejected the level write.
    WriteFailed { pin: Pin, reason: String },
    /// One or more pins could not be returned to input mode.
    ReleaseFailed(String),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration exists but could not be read.
    Io { path: String, reason: String },
    /// The content is not a list of `{ "pin": <integer> }` records.
    Malformed(String),
}

impl core::fmt::Display for GpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable { pin, reason } => write!(f, "pin {} unavailable: {}", pin, reason),
            Self::NotConfigured(pin) => write!(f, "pin {} is not configured as an output", pin),
            Self::WriteFailed { pin, reason } => write!(f, "write to pin {} failed: {}", pin, reason),
            Self::ReleaseFailed(reason) => write!(f, "release failed: {}", reason),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io { path, reason } => write!(f, "cannot read {}: {}", path, reason),
            Self::Malformed(msg) => write!(f, "malformed pump config: {}", msg),
        }
    }
}

impl std::error::Error for GpioError {}
impl std::error::Error for ConfigError {}
