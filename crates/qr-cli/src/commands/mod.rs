//! CLI command implementations
//!
//! Each submodule implements one subcommand.

pub mod binomial;
pub mod fd;
pub mod fd_grid;
pub mod monte_carlo;

use clap::{Args, ValueEnum};
use qr_core::{OptionType, Real};
use serde::Serialize;

use crate::Result;

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Contract and market inputs shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct MarketArgs {
    /// Call or put
    #[arg(short = 't', long, default_value = "call")]
    pub option_type: OptionType,

    /// Spot price of the underlying
    #[arg(short, long, default_value_t = 100.0)]
    pub spot: Real,

    /// Strike price
    #[arg(short = 'k', long, default_value_t = 100.0)]
    pub strike: Real,

    /// Continuously compounded risk-free rate
    #[arg(short, long, default_value_t = 0.05)]
    pub rate: Real,

    /// Annualised volatility
    #[arg(short = 'o', long, default_value_t = 0.2)]
    pub volatility: Real,

    /// Time to expiry in years
    #[arg(short, long, default_value_t = 1.0)]
    pub expiry: Real,
}

impl MarketArgs {
    /// Closed-form European price of the same contract.
    pub fn black_scholes(&self) -> Real {
        qr_methods::black_scholes_price(
            self.option_type,
            self.spot,
            self.strike,
            self.rate,
            0.0,
            self.volatility,
            self.expiry,
        )
    }
}

/// Print `report` as pretty JSON.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
