//! Command-line surface.
//!
//! `clap` does the parsing; its failures are translated into the crate's
//! error taxonomy so that every argument problem still ends in a single
//! JSON result line instead of clap's own report.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};

use crate::app::commands::AppCommand;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::Error;
use crate::pins::Pin;

/// Drive pump relays on the GPIO header and report the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "pumpctl", version, disable_help_subcommand = true)]
pub struct Cli {
    /// Pump configuration file (list of `{"pin": N, ...}` records)
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Drive an in-memory pin table instead of the GPIO chip
    #[arg(long, global = true)]
    pub simulate: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum CliCommand {
    /// Configure every pump pin as an output and drive it low
    Setup,

    /// Pulse one pin high for a number of milliseconds
    Activate {
        /// BCM pin number
        #[arg(allow_negative_numbers = true)]
        pin: Pin,
        /// Pulse width; negative values count as zero
        #[arg(allow_negative_numbers = true)]
        duration_ms: i64,
    },

    /// Return all pins to their default state
    Cleanup,

    /// Dispense a volume of one ingredient using its calibrated flow rate
    Dispense {
        /// Ingredient name or pump id
        pump: String,
        /// Volume in millilitres
        #[arg(allow_negative_numbers = true)]
        amount_ml: f32,
    },

    /// Flush every configured pump in turn
    Clean {
        /// Run time per pump [default: 10000]
        #[arg(allow_negative_numbers = true)]
        duration_ms: Option<i64>,
    },
}

impl From<CliCommand> for AppCommand {
    fn from(cmd: CliCommand) -> Self {
        match cmd {
            CliCommand::Setup => Self::Setup,
            CliCommand::Activate { pin, duration_ms } => Self::Activate { pin, duration_ms },
            CliCommand::Cleanup => Self::Cleanup,
            CliCommand::Dispense { pump, amount_ml } => Self::Dispense { pump, amount_ml },
            CliCommand::Clean { duration_ms } => Self::Clean { duration_ms },
        }
    }
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Run one command.
    Run(Cli),
    /// `--help` or `--version`; print it and exit successfully.
    Info(clap::Error),
}

/// Parse `args` (including the program name).
pub fn parse<I, T>(args: I) -> Result<Invocation, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Invocation::Run(cli)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Ok(Invocation::Info(e)),
            _ => Err(translate(&e)),
        },
    }
}

fn translate(e: &clap::Error) -> Error {
    match e.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Error::MissingCommand
        }
        ErrorKind::InvalidSubcommand => {
            Error::UnknownCommand(context_string(e, ContextKind::InvalidSubcommand).unwrap_or_default())
        }
        ErrorKind::ValueValidation | ErrorKind::InvalidValue | ErrorKind::InvalidUtf8 => {
            let value = context_string(e, ContextKind::InvalidValue).unwrap_or_default();
            let arg = context_string(e, ContextKind::InvalidArg).unwrap_or_else(|| "argument".into());
            Error::InvalidArgument(format!("'{value}' is not a valid value for {arg}"))
        }
        _ => Error::Usage(usage_line(e)),
    }
}

fn context_string(e: &clap::Error, kind: ContextKind) -> Option<String> {
    match e.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        ContextValue::Strings(v) => v.first().cloned(),
        ContextValue::StyledStr(s) => Some(s.to_string()),
        _ => None,
    }
}

/// clap's usage line without its "Usage: " prefix.
fn usage_line(e: &clap::Error) -> String {
    let usage = context_string(e, ContextKind::Usage)
        .unwrap_or_else(|| "pumpctl <setup | activate <PIN> <DURATION_MS> | cleanup>".into());
    let usage = usage.trim();
    usage
        .strip_prefix("Usage:")
        .map_or(usage, str::trim_start)
        .to_string()
}
