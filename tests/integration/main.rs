//! Integration test driver for `tests/integration/` submodule.
//!
//! Controller tests run against mock adapters; CLI tests run the built
//! binary with `--simulate`.  No real hardware required.

mod cli_tests;
mod mock_hw;
