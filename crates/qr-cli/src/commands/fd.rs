//! Compact finite-difference command

use clap::Args;
use qr_core::{OptionType, Real, Size};
use qr_methods::{finite_differences, FdGreeksRow};
use serde::Serialize;
use tracing::info;

use super::{print_json, MarketArgs, OutputFormat};
use crate::{CliError, Result};

/// Arguments of `quantrecipes fd`.
#[derive(Debug, Clone, Args)]
pub struct FdArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of asset steps across [0, 2K]
    #[arg(short = 'n', long, default_value_t = 20)]
    pub asset_steps: Size,

    /// Disable early exercise
    #[arg(long)]
    pub european: bool,
}

#[derive(Debug, Serialize)]
struct FdReport<'a> {
    option_type: OptionType,
    early_exercise: bool,
    asset_steps: Size,
    time_steps: Size,
    spot: Real,
    price: Real,
    black_scholes: Real,
    rows: &'a [FdGreeksRow],
}

/// Run the fd command
pub fn run(args: &FdArgs, format: OutputFormat) -> Result<()> {
    let m = &args.market;
    let upper = 2.0 * m.strike;
    if !(0.0..=upper).contains(&m.spot) {
        return Err(CliError::InvalidArgument(format!(
            "--spot {} must lie on the grid [0, {upper}] spanned by --strike",
            m.spot
        )));
    }

    let early_exercise = !args.european;
    let table = finite_differences::price_american_compact(
        m.volatility,
        m.rate,
        m.option_type,
        m.strike,
        m.expiry,
        early_exercise,
        args.asset_steps,
    )?;
    let price = table.price_at(m.spot)?;
    info!(asset_steps = args.asset_steps, time_steps = table.time_steps(), price, "finite differences priced");

    let report = FdReport {
        option_type: m.option_type,
        early_exercise,
        asset_steps: args.asset_steps,
        time_steps: table.time_steps(),
        spot: m.spot,
        price,
        black_scholes: m.black_scholes(),
        rows: table.rows(),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!(
                "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "asset", "payoff", "value", "delta", "gamma", "theta"
            );
            for row in report.rows {
                println!(
                    "{:>10.3} {:>10.3} {:>10.4} {:>10.4} {:>10.5} {:>10.4}",
                    row.asset_price, row.payoff, row.value, row.delta, row.gamma, row.theta
                );
            }
            let style = if early_exercise { "American" } else { "European" };
            println!();
            println!("{style} {} at S = {}: {:.6} ({} time steps)", m.option_type, m.spot, price, report.time_steps);
            println!("Black-Scholes European: {:.6}", report.black_scholes);
        }
    }
    Ok(())
}
