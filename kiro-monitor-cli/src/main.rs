//! Kiro usage monitor entry point
//!
//! Loads the panel configuration, wires the HTTP clients and JSON dump
//! adapters into the core services, and runs one of the subcommands.

mod adapters;
mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

/// Logs go to stderr; stdout carries the report.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("kiro_monitor=debug,kiro_monitor_core=debug,kiro_monitor_provider=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Monitor { interval, output } => {
            commands::monitor(&cli.config, &cli.panels, &output.output, interval).await
        }
        Command::Query { output } => commands::query(&cli.config, &cli.panels, &output.output).await,
        Command::Convert { input, output, to } => {
            commands::convert(&input, output.as_deref(), to.map(Into::into))
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
