//! Pump relay pulse driver.
//!
//! A pulse is strictly ordered:
//!
//! 1. configure the pin as an output
//! 2. drive it low
//! 3. wait the debounce delay
//! 4. drive it high
//! 5. hold for the requested duration
//! 6. drive it low
//!
//! ## Safety contract
//!
//! Once step 1 succeeds an [`OffGuard`] is armed.  Every exit path after
//! that point (a failed write, an unwind) attempts one more low write, so a
//! pump is never knowingly left running.  The guard cannot help if the chip
//! itself refuses writes; the result then reports the failure.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{debug, error, warn};

use crate::app::ports::GpioPort;
use crate::error::{Error, Result};
use crate::pins::Pin;

/// Drives `pin` low when dropped while still armed.
pub struct OffGuard<'a, G: GpioPort> {
    gpio: &'a mut G,
    pin: Pin,
    armed: bool,
}

impl<'a, G: GpioPort> OffGuard<'a, G> {
    pub fn arm(gpio: &'a mut G, pin: Pin) -> Self {
        Self {
            gpio,
            pin,
            armed: true,
        }
    }

    /// Write `level` to the guarded pin.
    pub fn write(&mut self, level: PinState) -> Result<()> {
        self.gpio
            .write(self.pin, level)
            .map_err(|source| Error::HardwareWrite {
                pin: self.pin,
                source,
            })
    }

    /// Drive the pin low and disarm.
    ///
    /// If the write fails the guard stays armed and retries once on drop.
    pub fn finish(mut self) -> Result<()> {
        let result = self.write(PinState::Low);
        self.armed = result.is_err();
        result
    }
}

impl<G: GpioPort> Drop for OffGuard<'_, G> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.gpio.write(self.pin, PinState::Low) {
            Ok(()) => warn!("pump: pin {} forced low after an interrupted pulse", self.pin),
            Err(e) => error!("pump: pin {} may still be high: {}", self.pin, e),
        }
    }
}

/// Run one complete pulse on `pin`.
///
/// `hold_ms` below zero is clamped to zero so a bad duration can never
/// block; the call then returns after roughly `debounce_ms`.
pub fn pulse<G, D>(gpio: &mut G, delay: &mut D, pin: Pin, debounce_ms: u32, hold_ms: i64) -> Result<()>
where
    G: GpioPort,
    D: DelayNs,
{
    gpio.configure_output(pin)
        .map_err(|source| Error::PinConfigure { pin, source })?;

    let mut guard = OffGuard::arm(gpio, pin);
    guard.write(PinState::Low)?;
    delay.delay_ms(debounce_ms);

    debug!("pump: pin {} high", pin);
    guard.write(PinState::High)?;
    hold(delay, hold_ms.max(0).unsigned_abs());

    debug!("pump: pin {} low", pin);
    guard.finish()
}

/// Block for `ms` milliseconds, in `u32` chunks.
fn hold<D: DelayNs>(delay: &mut D, ms: u64) {
    let mut remaining = ms;
    loop {
        let chunk = remaining.min(u64::from(u32::MAX));
        delay.delay_ms(chunk as u32);
        remaining -= chunk;
        if remaining == 0 {
            break;
        }
    }
}
