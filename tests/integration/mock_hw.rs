//! Mock adapters for integration tests.
//!
//! The GPIO mock and the delay mock append to one shared call log, so tests
//! can assert on the exact interleaving of pin writes and waits without
//! touching a real GPIO chip.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use pumpctl::app::ports::{ConfigError, ConfigPort, GpioError, GpioPort};
use pumpctl::config::PumpConfig;
use pumpctl::pins::Pin;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Configure(Pin),
    Write(Pin, PinState),
    ReleaseAll,
    Delay(u32),
}

pub type CallLog = Rc<RefCell<Vec<HwCall>>>;

// ── MockGpio ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGpio {
    log: CallLog,
    /// Pins whose configuration is refused.
    pub fail_configure: BTreeSet<Pin>,
    /// Pins whose HIGH writes are refused.
    pub fail_high: BTreeSet<Pin>,
    /// Pins whose every write is refused.
    pub fail_writes: BTreeSet<Pin>,
    pub fail_release: bool,
    configured: BTreeSet<Pin>,
}

impl MockGpio {
    pub fn calls(&self) -> Vec<HwCall> {
        self.log.borrow().clone()
    }
}

impl GpioPort for MockGpio {
    fn configure_output(&mut self, pin: Pin) -> Result<(), GpioError> {
        self.log.borrow_mut().push(HwCall::Configure(pin));
        if self.fail_configure.contains(&pin) {
            return Err(GpioError::Unavailable {
                pin,
                reason: "claimed by another driver".into(),
            });
        }
        self.configured.insert(pin);
        Ok(())
    }

    fn write(&mut self, pin: Pin, level: PinState) -> Result<(), GpioError> {
        self.log.borrow_mut().push(HwCall::Write(pin, level));
        if !self.configured.contains(&pin) {
            return Err(GpioError::NotConfigured(pin));
        }
        let refused = self.fail_writes.contains(&pin)
            || (level == PinState::High && self.fail_high.contains(&pin));
        if refused {
            return Err(GpioError::WriteFailed {
                pin,
                reason: "line stuck".into(),
            });
        }
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), GpioError> {
        self.log.borrow_mut().push(HwCall::ReleaseAll);
        if self.fail_release {
            return Err(GpioError::ReleaseFailed("chip busy".into()));
        }
        self.configured.clear();
        Ok(())
    }
}

// ── MockDelay ─────────────────────────────────────────────────

pub struct MockDelay {
    log: CallLog,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(HwCall::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(HwCall::Delay(ms));
    }
}

/// A GPIO mock and a delay mock writing to the same log.
pub fn mock_hw() -> (MockGpio, MockDelay, CallLog) {
    let log = CallLog::default();
    let gpio = MockGpio {
        log: Rc::clone(&log),
        ..MockGpio::default()
    };
    let delay = MockDelay {
        log: Rc::clone(&log),
    };
    (gpio, delay, log)
}

// ── Log queries ───────────────────────────────────────────────

/// Every pin that was configured or written.
pub fn touched(calls: &[HwCall]) -> BTreeSet<Pin> {
    calls
        .iter()
        .filter_map(|c| match c {
            HwCall::Configure(pin) | HwCall::Write(pin, _) => Some(*pin),
            _ => None,
        })
        .collect()
}

/// Last level written to each pin.
pub fn final_levels(calls: &[HwCall]) -> BTreeMap<Pin, PinState> {
    let mut levels = BTreeMap::new();
    for c in calls {
        if let HwCall::Write(pin, level) = c {
            levels.insert(*pin, *level);
        }
    }
    levels
}

/// Sum of every wait.
pub fn total_delay_ms(calls: &[HwCall]) -> u64 {
    calls
        .iter()
        .map(|c| match c {
            HwCall::Delay(ms) => u64::from(*ms),
            _ => 0,
        })
        .sum()
}

// ── StaticConfig ──────────────────────────────────────────────

pub struct StaticConfig(pub Result<Option<Vec<PumpConfig>>, ConfigError>);

impl StaticConfig {
    pub fn pins(pins: &[Pin]) -> Self {
        Self(Ok(Some(pins.iter().map(|&p| PumpConfig::pin(p)).collect())))
    }

    pub fn records(records: Vec<PumpConfig>) -> Self {
        Self(Ok(Some(records)))
    }

    pub fn absent() -> Self {
        Self(Ok(None))
    }

    pub fn malformed() -> Self {
        Self(Err(ConfigError::Malformed("EOF while parsing a list".into())))
    }
}

impl ConfigPort for StaticConfig {
    fn load(&self) -> Result<Option<Vec<PumpConfig>>, ConfigError> {
        self.0.clone()
    }
}
