//! GPIO pin numbering for the pump header.
//!
//! Pins are BCM line numbers (the SoC's logical GPIO numbers), not physical
//! header positions.  Every module references this one rather than
//! hard-coding ranges.

use core::ops::RangeInclusive;

/// A BCM-numbered GPIO line.
pub type Pin = u8;

// ---------------------------------------------------------------------------
// Header bank
// ---------------------------------------------------------------------------

/// Highest BCM line routed to the 40-pin header.
pub const MAX_HEADER_PIN: Pin = 27;

/// Lines initialised when no pump configuration file exists.
pub const DEFAULT_PINS: RangeInclusive<Pin> = 1..=MAX_HEADER_PIN;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Settle time with the line held low before a pulse starts.
/// Guarantees a clean rising edge even if a crashed run left the line high.
pub const DEBOUNCE_MS: u32 = 50;

/// Per-pump flush time used by `clean` when no duration is given.
pub const CLEAN_DURATION_MS: i64 = 10_000;

/// Returns `true` when `pin` is a line on the header bank.
pub const fn is_header_pin(pin: Pin) -> bool {
    pin <= MAX_HEADER_PIN
}
