//! Inbound commands to the pin controller.
//!
//! One command is executed per process.  The CLI parser produces these and
//! [`PinController::handle_command`](super::service::PinController::handle_command)
//! interprets them.

use crate::pins::Pin;

/// Commands that the command line can send into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Configure every pump pin as an output and drive it low.
    Setup,

    /// Pulse one pin high for `duration_ms` (negative values are treated as zero).
    Activate { pin: Pin, duration_ms: i64 },

    /// Return every pin to its default, unclaimed state.
    Cleanup,

    /// Pump `amount_ml` of one ingredient, timed from its calibrated flow rate.
    Dispense { pump: String, amount_ml: f32 },

    /// Flush every configured pump in turn; `None` uses the configured default.
    Clean { duration_ms: Option<i64> },
}

impl AppCommand {
    /// Name used on the command line and in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Activate { .. } => "activate",
            Self::Cleanup => "cleanup",
            Self::Dispense { .. } => "dispense",
            Self::Clean { .. } => "clean",
        }
    }
}
