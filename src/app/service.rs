//! Pin controller: the hexagonal core.
//!
//! [`PinController`] owns the GPIO handle and a delay source and sequences
//! GPIO calls safely.  All I/O flows through port traits, making the whole
//! controller testable with mock adapters.
//!
//! ```text
//!  ConfigPort ──▶ ┌────────────────────────┐ ──▶ OperationResult
//!                 │     PinController      │
//!   GpioPort ◀────│  setup · pulse · free  │
//!                 └────────────────────────┘
//! ```
//!
//! Per pin the life cycle is
//! `unclaimed → output low → output high → output low → … → unclaimed`;
//! every path to high passes through output low first.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{debug, error, info, warn};

use crate::config::{ControllerSettings, PumpConfig};
use crate::drivers::pump;
use crate::error::{Error, Result};
use crate::pins::Pin;

use super::commands::AppCommand;
use super::ports::{ConfigPort, GpioPort};
use super::report::OperationResult;

// ───────────────────────────────────────────────────────────────
// Reports
// ───────────────────────────────────────────────────────────────

/// Where the pins initialised by `initialize` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSource {
    /// Records from the pump configuration.
    Config,
    /// The default range; no configuration exists.
    DefaultRange,
}

/// What `initialize` did, pin by pin.
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    pub source: PinSource,
    /// Pins now configured as low outputs, in the order they were visited.
    pub initialised: Vec<Pin>,
    /// Pins that could not be configured or driven low.
    pub failed: Vec<(Pin, Error)>,
}

impl InitReport {
    /// Apply the reporting policy.
    ///
    /// Configured pins are known pumps, so any failure among them fails the
    /// operation.  Default-range failures are tolerated and only listed.
    pub fn into_result(self) -> Result<String> {
        match self.source {
            PinSource::Config if !self.failed.is_empty() => Err(Error::PinsFailed(self.failed)),
            PinSource::Config => Ok(format!(
                "{} configured pin(s) initialised low",
                self.initialised.len()
            )),
            PinSource::DefaultRange if self.failed.is_empty() => Ok(format!(
                "{} default pin(s) initialised low",
                self.initialised.len()
            )),
            PinSource::DefaultRange => {
                let skipped: Vec<String> = self.failed.iter().map(|(pin, _)| pin.to_string()).collect();
                Ok(format!(
                    "{} default pin(s) initialised low; skipped {}",
                    self.initialised.len(),
                    skipped.join(", ")
                ))
            }
        }
    }
}

/// What `dispense` ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispensed {
    pub label: String,
    pub pin: Pin,
    pub amount_ml: f32,
    pub duration_ms: i64,
}

// ───────────────────────────────────────────────────────────────
// PinController
// ───────────────────────────────────────────────────────────────

pub struct PinController<G: GpioPort, D: DelayNs> {
    gpio: G,
    delay: D,
    settings: ControllerSettings,
}

impl<G: GpioPort, D: DelayNs> PinController<G, D> {
    pub fn new(gpio: G, delay: D) -> Self {
        Self::with_settings(gpio, delay, ControllerSettings::default())
    }

    pub fn with_settings(gpio: G, delay: D, settings: ControllerSettings) -> Self {
        Self {
            gpio,
            delay,
            settings,
        }
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Give the adapters back (tests inspect them after a run).
    pub fn into_parts(self) -> (G, D) {
        (self.gpio, self.delay)
    }

    // ── Operations ────────────────────────────────────────────

    /// Configure every pump pin as a low output.
    ///
    /// Uses the configuration records when present, otherwise the default
    /// range.  A failing pin never stops the remaining pins.  Only a failure
    /// to load the configuration is returned as `Err`.
    pub fn initialize(&mut self, config: &impl ConfigPort) -> Result<InitReport> {
        let (source, targets): (PinSource, Vec<Pin>) = match config.load()? {
            Some(pumps) => (PinSource::Config, pumps.iter().map(|p| p.pin).collect()),
            None => {
                info!("setup: no pump config, using default pins");
                (PinSource::DefaultRange, self.settings.default_pins.clone().collect())
            }
        };

        let mut report = InitReport {
            source,
            initialised: Vec::with_capacity(targets.len()),
            failed: Vec::new(),
        };
        for pin in targets {
            match self.set_low_output(pin) {
                Ok(()) => {
                    debug!("setup: pin {} low", pin);
                    report.initialised.push(pin);
                }
                Err(e) => {
                    warn!("setup: {}", e);
                    report.failed.push((pin, e));
                }
            }
        }
        info!(
            "setup: {} pin(s) low, {} failed ({:?})",
            report.initialised.len(),
            report.failed.len(),
            report.source
        );
        Ok(report)
    }

    /// Pulse `pin` high for `duration_ms` milliseconds.
    ///
    /// Blocks for the whole pulse.  Negative durations are treated as zero.
    pub fn activate(&mut self, pin: Pin, duration_ms: i64) -> Result<()> {
        info!("activate: pin {} for {} ms", pin, duration_ms);
        pump::pulse(
            &mut self.gpio,
            &mut self.delay,
            pin,
            self.settings.debounce_ms,
            duration_ms,
        )
    }

    /// Return every pin to its default, unclaimed state.
    pub fn release(&mut self) -> Result<()> {
        self.gpio.release_all().map_err(Error::Release)?;
        info!("cleanup: pins released");
        Ok(())
    }

    /// Run the pump for `pump` (ingredient or id) long enough to move `amount_ml`.
    pub fn dispense(&mut self, config: &impl ConfigPort, pump: &str, amount_ml: f32) -> Result<Dispensed> {
        if !amount_ml.is_finite() || amount_ml <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "amount must be a positive number of millilitres, got {amount_ml}"
            )));
        }
        let pumps = config.load()?.ok_or(Error::NoPumpConfig)?;
        let record = pumps
            .iter()
            .find(|p| p.matches(pump))
            .ok_or_else(|| Error::UnknownPump(pump.to_string()))?;
        let duration_ms = dispense_duration_ms(record, amount_ml)?;

        info!(
            "dispense: {:.1} ml of {} -> pin {} for {} ms",
            amount_ml,
            record.label(),
            record.pin,
            duration_ms
        );
        self.activate(record.pin, duration_ms)?;
        Ok(Dispensed {
            label: record.label(),
            pin: record.pin,
            amount_ml,
            duration_ms,
        })
    }

    /// Flush every configured pump in turn for `duration_ms` each.
    ///
    /// Returns the pins that ran.  A failing pump does not stop the rest.
    pub fn clean(&mut self, config: &impl ConfigPort, duration_ms: i64) -> Result<Vec<Pin>> {
        let pumps = config.load()?.ok_or(Error::NoPumpConfig)?;
        let mut cleaned = Vec::with_capacity(pumps.len());
        let mut failed = Vec::new();
        for record in &pumps {
            info!("clean: {} (pin {})", record.label(), record.pin);
            match self.activate(record.pin, duration_ms) {
                Ok(()) => cleaned.push(record.pin),
                Err(e) => {
                    warn!("clean: {}", e);
                    failed.push((record.pin, e));
                }
            }
        }
        if failed.is_empty() {
            Ok(cleaned)
        } else {
            Err(Error::PinsFailed(failed))
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Execute one command and convert the outcome into the result line.
    ///
    /// Nothing below this boundary escapes as an error.
    pub fn handle_command(&mut self, cmd: AppCommand, config: &impl ConfigPort) -> OperationResult {
        let name = cmd.name();
        let outcome = match cmd {
            AppCommand::Setup => self.initialize(config).and_then(InitReport::into_result),
            AppCommand::Activate { pin, duration_ms } => self
                .activate(pin, duration_ms)
                .map(|()| format!("pump on pin {pin} ran for {} ms", duration_ms.max(0))),
            AppCommand::Cleanup => self
                .release()
                .map(|()| "GPIO pins released".to_string()),
            AppCommand::Dispense { pump, amount_ml } => {
                self.dispense(config, &pump, amount_ml).map(|d| {
                    format!(
                        "dispensed {:.1} ml of {} (pin {}, {} ms)",
                        d.amount_ml, d.label, d.pin, d.duration_ms
                    )
                })
            }
            AppCommand::Clean { duration_ms } => {
                let duration_ms = duration_ms.unwrap_or(self.settings.clean_duration_ms);
                self.clean(config, duration_ms).map(|pins| {
                    format!(
                        "cleaned {} pump(s) for {} ms each",
                        pins.len(),
                        duration_ms.max(0)
                    )
                })
            }
        };

        if let Err(e) = &outcome {
            error!("{}: {}", name, e);
        }
        OperationResult::from(outcome)
    }

    // ── Internals ─────────────────────────────────────────────

    fn set_low_output(&mut self, pin: Pin) -> Result<()> {
        self.gpio
            .configure_output(pin)
            .map_err(|source| Error::PinConfigure { pin, source })?;
        self.gpio
            .write(pin, PinState::Low)
            .map_err(|source| Error::HardwareWrite { pin, source })
    }
}

/// Pump-on time for `amount_ml` at the record's calibrated flow rate.
pub fn dispense_duration_ms(record: &PumpConfig, amount_ml: f32) -> Result<i64> {
    match record.flow_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => {
            Ok((f64::from(amount_ml) / f64::from(rate) * 1000.0).round() as i64)
        }
        _ => Err(Error::Uncalibrated(record.label())),
    }
}
