//! Unified error type for pumpctl.
//!
//! Every fallible operation funnels into [`Error`] so the command boundary
//! can turn any failure into one uniform result line.

use core::fmt;

use crate::app::ports::{ConfigError, GpioError};
use crate::pins::Pin;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The GPIO chip could not be opened with BCM numbering.  Fatal.
    ModeSetup(String),
    /// The pump configuration exists but could not be loaded.
    ConfigLoad(ConfigError),
    /// A pin could not be claimed as an output.
    PinConfigure { pin: Pin, source: GpioError },
    /// A level write failed; the line's electrical state is unknown.
    HardwareWrite { pin: Pin, source: GpioError },
    /// Returning pins to their default state failed.
    Release(GpioError),
    /// Some pins of a multi-pin operation failed; siblings still ran.
    PinsFailed(Vec<(Pin, Error)>),
    /// A command argument could not be interpreted.
    InvalidArgument(String),
    /// Wrong number of arguments for a command.  Carries the usage line.
    Usage(String),
    /// The command name is not one we know.
    UnknownCommand(String),
    /// No command was given at all.
    MissingCommand,
    /// The operation needs pump records but no configuration exists.
    NoPumpConfig,
    /// No pump record matches the requested ingredient or id.
    UnknownPump(String),
    /// The pump record has no usable flow rate.
    Uncalibrated(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeSetup(msg) => write!(f, "cannot set GPIO mode: {msg}"),
            Self::ConfigLoad(e) => write!(f, "cannot load pump config: {e}"),
            Self::PinConfigure { pin, source } => {
                write!(f, "cannot configure pin {pin}: {source}")
            }
            Self::HardwareWrite { pin, source } => {
                write!(f, "cannot drive pin {pin}: {source}")
            }
            Self::Release(e) => write!(f, "cannot release GPIO pins: {e}"),
            Self::PinsFailed(failures) => {
                write!(f, "{} pin(s) failed: ", failures.len())?;
                for (i, (pin, e)) in failures.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "pin {pin}: {e}")?;
                }
                Ok(())
            }
            Self::InvalidArgument(msg) => write!(f, "invalid parameters: {msg}"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::UnknownCommand(name) => write!(f, "unknown command: {name}"),
            Self::MissingCommand => {
                write!(f, "no command given; expected setup, activate, cleanup, dispense or clean")
            }
            Self::NoPumpConfig => write!(f, "no pump configuration found"),
            Self::UnknownPump(name) => write!(f, "no pump configured for '{name}'"),
            Self::Uncalibrated(name) => {
                write!(f, "pump '{name}' has no positive flow rate; calibrate it first")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigLoad(e) => Some(e),
            Self::PinConfigure { source, .. } | Self::HardwareWrite { source, .. } => Some(source),
            Self::Release(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::ConfigLoad(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
