//! Simulated GPIO chip.
//!
//! Keeps the pin table in memory only.  Used for `--simulate` dry runs,
//! builds without the `rpi` feature, and host tests.  Lines outside the
//! header bank are rejected the way the real chip rejects unknown lines.

use std::collections::BTreeMap;

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::ports::{GpioError, GpioPort};
use crate::pins::{self, Pin};

/// In-memory pin table: every configured output and its last level.
#[derive(Debug, Default)]
pub struct SimGpio {
    outputs: BTreeMap<Pin, PinState>,
    releases: usize,
}

impl SimGpio {
    pub fn new() -> Self {
        debug!("sim_gpio: BCM numbering, in-memory pin table");
        Self::default()
    }

    /// Last level written to `pin`, or `None` if it is not an output.
    pub fn level(&self, pin: Pin) -> Option<PinState> {
        self.outputs.get(&pin).copied()
    }

    /// Pins currently claimed as outputs, ascending.
    pub fn configured_pins(&self) -> Vec<Pin> {
        self.outputs.keys().copied().collect()
    }

    /// How many times [`GpioPort::release_all`] has run.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl GpioPort for SimGpio {
    fn configure_output(&mut self, pin: Pin) -> Result<(), GpioError> {
        if !pins::is_header_pin(pin) {
            return Err(GpioError::Unavailable {
                pin,
                reason: format!("no such line (header bank is 0..={})", pins::MAX_HEADER_PIN),
            });
        }
        // Newly claimed lines start low, like `into_output_low` on the real chip.
        self.outputs.entry(pin).or_insert(PinState::Low);
        debug!("sim_gpio: pin {} output", pin);
        Ok(())
    }

    fn write(&mut self, pin: Pin, level: PinState) -> Result<(), GpioError> {
        let slot = self
            .outputs
            .get_mut(&pin)
            .ok_or(GpioError::NotConfigured(pin))?;
        *slot = level;
        debug!("sim_gpio: pin {} {:?}", pin, level);
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), GpioError> {
        debug!("sim_gpio: releasing {} pin(s)", self.outputs.len());
        self.outputs.clear();
        self.releases += 1;
        Ok(())
    }
}
