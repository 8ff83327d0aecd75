//! pumpctl: one command per process.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  cli::parse ──▶ open GPIO (BCM) ──▶ PinController        │
//! │                                      │                   │
//! │   JsonFileConfig (ConfigPort) ───────┤                   │
//! │   RppalGpio | SimGpio (GpioPort) ────┤                   │
//! │   StdDelay (DelayNs) ────────────────┘                   │
//! │                                                          │
//! │  stdout: exactly one JSON result line                    │
//! │  stderr: log output (RUST_LOG, default "info")           │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{debug, error, info};

use pumpctl::adapters::config_file::JsonFileConfig;
use pumpctl::adapters::delay::StdDelay;
use pumpctl::adapters::sim_gpio::SimGpio;
use pumpctl::app::commands::AppCommand;
use pumpctl::app::ports::GpioPort;
use pumpctl::app::report::OperationResult;
use pumpctl::app::service::PinController;
use pumpctl::cli::{self, Cli, Invocation};
use pumpctl::config::ControllerSettings;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = match cli::parse(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Info(msg)) => {
            msg.print().context("print help")?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            error!("{}", e);
            return emit(&OperationResult::failed(&e));
        }
    };

    info!("pumpctl v{}", env!("CARGO_PKG_VERSION"));
    let result = dispatch(cli);
    emit(&result)
}

/// Acquire the GPIO chip and run the single command.
fn dispatch(cli: Cli) -> OperationResult {
    let command = AppCommand::from(cli.command);
    let settings = ControllerSettings {
        config_path: cli.config,
        ..ControllerSettings::default()
    };
    debug!("command: {:?}, config: {}", command, settings.config_path.display());

    if cli.simulate {
        info!("gpio: simulated pin table");
        return run(SimGpio::new(), settings, command);
    }
    open_hardware(settings, command)
}

#[cfg(feature = "rpi")]
fn open_hardware(settings: ControllerSettings, command: AppCommand) -> OperationResult {
    use pumpctl::adapters::rppal_gpio::RppalGpio;

    match RppalGpio::open() {
        Ok(gpio) => run(gpio, settings, command),
        Err(e) => {
            // Mode setup failure is fatal: nothing is dispatched.
            error!("{}", e);
            OperationResult::failed(&e)
        }
    }
}

#[cfg(not(feature = "rpi"))]
fn open_hardware(settings: ControllerSettings, command: AppCommand) -> OperationResult {
    log::warn!("gpio: built without the `rpi` feature, using simulated pin table");
    run(SimGpio::new(), settings, command)
}

fn run<G: GpioPort>(gpio: G, settings: ControllerSettings, command: AppCommand) -> OperationResult {
    let config = JsonFileConfig::new(&settings.config_path);
    let mut controller = PinController::with_settings(gpio, StdDelay::new(), settings);
    controller.handle_command(command, &config)
}

/// Write the single result line to stdout.
fn emit(result: &OperationResult) -> Result<ExitCode> {
    let line = result.to_json_line().context("serialise result")?;
    let mut out = io::stdout().lock();
    writeln!(out, "{line}").context("write result")?;
    out.flush().context("flush stdout")?;
    Ok(result.exit_code())
}
