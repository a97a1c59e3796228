//! Binomial lattice command

use clap::Args;
use qr_core::{OptionType, Real, Size};
use qr_methods::{lattice, AmericanLattice};
use serde::Serialize;
use tracing::info;

use super::{print_json, MarketArgs, OutputFormat};
use crate::Result;

/// Arguments of `quantrecipes binomial`.
#[derive(Debug, Clone, Args)]
pub struct BinomialArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of time steps in the tree
    #[arg(short = 'n', long, default_value_t = 200)]
    pub steps: Size,

    /// Allow early exercise
    #[arg(long)]
    pub american: bool,
}

#[derive(Debug, Serialize)]
struct BinomialReport {
    option_type: OptionType,
    style: &'static str,
    steps: Size,
    up: Real,
    down: Real,
    probability: Real,
    price: Real,
    black_scholes: Real,
}

fn price(args: &BinomialArgs) -> Result<BinomialReport> {
    let m = &args.market;
    let (style, params, price) = if args.american {
        let tree = AmericanLattice::build(m.option_type, m.spot, m.volatility, m.rate, m.strike, m.expiry, args.steps)?;
        ("american", *tree.parameters(), tree.price())
    } else {
        let params = lattice::BinomialParameters::new(m.volatility, m.rate, m.expiry, args.steps)?;
        let price = lattice::price_european(m.option_type, m.spot, m.volatility, m.rate, m.strike, m.expiry, args.steps)?;
        ("european", params, price)
    };
    info!(style, steps = args.steps, price, "binomial lattice priced");

    Ok(BinomialReport {
        option_type: m.option_type,
        style,
        steps: args.steps,
        up: params.up,
        down: params.down,
        probability: params.probability,
        price,
        black_scholes: m.black_scholes(),
    })
}

/// Run the binomial command
pub fn run(args: &BinomialArgs, format: OutputFormat) -> Result<()> {
    let report = price(args)?;
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("Binomial lattice ({} {}, {} steps)", report.style, report.option_type, report.steps);
            println!("  u = {:.6}  d = {:.6}  p = {:.6}", report.up, report.down, report.probability);
            println!("  price          {:>12.6}", report.price);
            println!("  Black-Scholes  {:>12.6}", report.black_scholes);
        }
    }
    Ok(())
}
