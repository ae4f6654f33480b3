//! `face-qa`: passport-photo conformance checking from the command line.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::check::CheckArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Check(args)) => check(args, &config),
        Some(Commands::Thresholds(args)) => {
            or_error(commands::thresholds::run(&args, &config).map(|()| ExitCode::Success))
        }
        None if cli.check.paths.is_empty() => {
            eprintln!("error: No paths specified. Use --help for usage information.");
            ExitCode::Error
        }
        None => check(cli.check, &config),
    };

    exit_code.into()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new(level))
        .init();
}

fn check(args: CheckArgs, config: &AppConfig) -> ExitCode {
    let args = CheckArgs::with_config(args, config);
    or_error(commands::check::run(&args).map(|summary| summary.exit_code()))
}

fn or_error(result: anyhow::Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Error
    })
}
