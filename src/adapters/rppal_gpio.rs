//! Raspberry Pi GPIO adapter.
//!
//! Implements [`GpioPort`] on top of `rppal`, which always addresses lines
//! by their BCM number.  Opening the chip is the one-time "mode setup";
//! if it fails nothing else can run.
//!
//! Claimed outputs are created with reset-on-drop disabled: a `setup` or
//! `activate` run must leave its pins as low outputs after the process
//! exits.  Only [`GpioPort::release_all`] hands lines back, by switching
//! them to inputs.
//!
//! `cleanup` usually runs in a fresh process, so release also covers header
//! lines that are currently outputs.  Lines in any other mode (inputs, the
//! ALT functions behind I²C, SPI and the serial console) are left untouched.

use std::collections::{BTreeMap, BTreeSet};

use embedded_hal::digital::{Error as _, OutputPin as _, PinState};
use log::{debug, info, warn};
use rppal::gpio::{Gpio, Mode, OutputPin};

use crate::app::ports::{GpioError, GpioPort};
use crate::error::Error;
use crate::pins::{self, Pin};

pub struct RppalGpio {
    chip: Gpio,
    outputs: BTreeMap<Pin, OutputPin>,
    /// Lines claimed as outputs by this process.
    claimed: BTreeSet<Pin>,
}

impl RppalGpio {
    /// Open the GPIO chip.
    pub fn open() -> Result<Self, Error> {
        let chip = Gpio::new().map_err(|e| Error::ModeSetup(e.to_string()))?;
        info!("rppal_gpio: chip opened, BCM numbering");
        Ok(Self {
            chip,
            outputs: BTreeMap::new(),
            claimed: BTreeSet::new(),
        })
    }
}

/// Whether `release_all` switches a line in `mode` back to input.
fn needs_release(mode: Mode, claimed: bool) -> bool {
    claimed || mode == Mode::Output
}

impl GpioPort for RppalGpio {
    fn configure_output(&mut self, pin: Pin) -> Result<(), GpioError> {
        if self.outputs.contains_key(&pin) {
            return Ok(());
        }
        let line = self.chip.get(pin).map_err(|e| GpioError::Unavailable {
            pin,
            reason: e.to_string(),
        })?;
        let mut out = line.into_output_low();
        out.set_reset_on_drop(false);
        self.outputs.insert(pin, out);
        self.claimed.insert(pin);
        debug!("rppal_gpio: pin {} output", pin);
        Ok(())
    }

    fn write(&mut self, pin: Pin, level: PinState) -> Result<(), GpioError> {
        let out = self
            .outputs
            .get_mut(&pin)
            .ok_or(GpioError::NotConfigured(pin))?;
        out.set_state(level).map_err(|e| GpioError::WriteFailed {
            pin,
            reason: format!("{:?}", e.kind()),
        })
    }

    fn release_all(&mut self) -> Result<(), GpioError> {
        // Drop our handles first so the lines can be re-acquired below.
        self.outputs.clear();

        let candidates: BTreeSet<Pin> = pins::DEFAULT_PINS.chain(self.claimed.iter().copied()).collect();
        let mut released = 0usize;
        let mut failed = Vec::new();
        for pin in candidates {
            let claimed = self.claimed.contains(&pin);
            match self.chip.get(pin) {
                Ok(line) => {
                    let mode = line.mode();
                    if !needs_release(mode, claimed) {
                        debug!("rppal_gpio: pin {} left in {:?}", pin, mode);
                        continue;
                    }
                    let mut input = line.into_input();
                    input.set_reset_on_drop(false);
                    released += 1;
                }
                Err(e) if claimed => {
                    warn!("rppal_gpio: cannot release pin {}: {}", pin, e);
                    failed.push(format!("pin {pin}: {e}"));
                }
                Err(e) => debug!("rppal_gpio: pin {} skipped: {}", pin, e),
            }
        }
        self.claimed.clear();

        if failed.is_empty() {
            info!("rppal_gpio: {} pin(s) returned to input", released);
            Ok(())
        } else {
            Err(GpioError::ReleaseFailed(failed.join("; ")))
        }
    }
}
