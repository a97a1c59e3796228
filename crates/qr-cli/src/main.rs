//! quantrecipes CLI - price vanilla options with the numerical engines
//!
//! # Commands
//!
//! - `quantrecipes fd-grid` - full explicit finite-difference grid, written as TSV
//! - `quantrecipes fd` - today's finite-difference curve with delta, gamma, theta
//! - `quantrecipes binomial` - European or American binomial lattice price
//! - `quantrecipes monte-carlo` - parallel or sequential Monte Carlo price
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`; `--verbose`
//! raises the default level to `debug`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;

pub use error::{CliError, Result};

use commands::OutputFormat;

/// Finite-difference, binomial and Monte Carlo option pricing
#[derive(Parser)]
#[command(name = "quantrecipes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the full finite-difference value grid to a TSV file
    FdGrid(commands::fd_grid::FdGridArgs),

    /// Today's finite-difference values and Greeks
    Fd(commands::fd::FdArgs),

    /// Binomial lattice price
    Binomial(commands::binomial::BinomialArgs),

    /// Monte Carlo price
    MonteCarlo(commands::monte_carlo::MonteCarloArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::FdGrid(args) => commands::fd_grid::run(&args, cli.format),
        Commands::Fd(args) => commands::fd::run(&args, cli.format),
        Commands::Binomial(args) => commands::binomial::run(&args, cli.format),
        Commands::MonteCarlo(args) => commands::monte_carlo::run(&args, cli.format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from([
            "quantrecipes",
            "monte-carlo",
            "--trials",
            "1000",
            "--sequential",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::MonteCarlo(args) => {
                assert_eq!(args.trials, 1000);
                assert!(args.sequential);
            }
            _ => panic!("expected monte-carlo"),
        }

        let cli = Cli::try_parse_from(["quantrecipes", "binomial", "--american", "--option-type", "put"]).unwrap();
        match cli.command {
            Commands::Binomial(args) => {
                assert!(args.american);
                assert_eq!(args.market.option_type, qr_core::OptionType::Put);
            }
            _ => panic!("expected binomial"),
        }
    }

    #[test]
    fn rejects_unknown_option_type() {
        assert!(Cli::try_parse_from(["quantrecipes", "fd", "--option-type", "straddle"]).is_err());
    }
}
