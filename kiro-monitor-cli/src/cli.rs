//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kiro_monitor_core::config::DEFAULT_CONFIG_FILE;
use kiro_monitor_core::services::CredentialFormat;

/// Kiro usage monitor for CLIProxyPlus panels
#[derive(Parser, Debug)]
#[command(name = "kiro-monitor", version, about)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Only use this panel (repeatable, case-insensitive)
    #[arg(short = 'p', long = "panel", global = true)]
    pub panels: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll all panels periodically and estimate the consumption rate
    Monitor {
        /// Polling interval in seconds
        #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Query the balance of every Kiro account once
    Query {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Convert a Kiro credential file between aiclient and cliproxy layouts
    Convert {
        /// Input JSON file
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target format (default: the other one)
        #[arg(long, value_enum)]
        to: Option<FormatArg>,
    },
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory for JSON dumps
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// camelCase (aiclient2api)
    Aiclient,
    /// snake_case (CLIProxyPlus)
    Cliproxy,
}

impl From<FormatArg> for CredentialFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Aiclient => Self::AiClient,
            FormatArg::Cliproxy => Self::CliProxy,
        }
    }
}
