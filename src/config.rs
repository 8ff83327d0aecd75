//! Pump configuration records and controller settings.
//!
//! The pump records come from `data/pump-config.json`, written by the
//! dispenser front-end.  Only `pin` matters to the pin controller; the
//! remaining fields feed `dispense` and are otherwise carried along.

use std::path::PathBuf;

use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::pins::{self, Pin};

/// Default location of the pump configuration, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "data/pump-config.json";

/// One pump as stored in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpConfig {
    /// Pump number shown to the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// BCM line driving the pump relay.
    pub pin: Pin,
    /// Ingredient currently connected to the pump.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,
    /// Calibrated flow in mL/s.
    #[serde(
        rename = "flowRate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub flow_rate: Option<f32>,
}

impl PumpConfig {
    /// A record carrying only a pin.
    pub fn pin(pin: Pin) -> Self {
        Self {
            id: None,
            pin,
            ingredient: None,
            flow_rate: None,
        }
    }

    /// Human-readable label: ingredient, then id, then pin.
    pub fn label(&self) -> String {
        match (&self.ingredient, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("pump {id}"),
            (None, None) => format!("pin {}", self.pin),
        }
    }

    /// Does `key` name this pump, by ingredient (case-insensitive) or id?
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        if self
            .ingredient
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(key))
        {
            return true;
        }
        matches!((self.id, key.parse::<u32>()), (Some(id), Ok(wanted)) if id == wanted)
    }
}

/// Tunables of the pin controller itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Where the pump records live.
    pub config_path: PathBuf,
    /// Low settle time before every pulse (milliseconds).
    pub debounce_ms: u32,
    /// Pins initialised when no configuration exists.
    pub default_pins: RangeInclusive<Pin>,
    /// Per-pump flush time for `clean` (milliseconds).
    pub clean_duration_ms: i64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            debounce_ms: pins::DEBOUNCE_MS,
            default_pins: pins::DEFAULT_PINS,
            clean_duration_ms: pins::CLEAN_DURATION_MS,
        }
    }
}
