//! Full finite-difference grid command

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use qr_core::Size;
use qr_methods::{finite_differences, FdGrid};
use serde::Serialize;
use tracing::info;

use super::{print_json, MarketArgs, OutputFormat};
use crate::Result;

/// Arguments of `quantrecipes fd-grid`.
#[derive(Debug, Clone, Args)]
pub struct FdGridArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of asset steps across [0, 2K]
    #[arg(short = 'n', long, default_value_t = 20)]
    pub asset_steps: Size,

    /// Apply early exercise at every step
    #[arg(long)]
    pub american: bool,

    /// Destination of the tab-separated grid
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
struct FdGridReport {
    output: String,
    rows: Size,
    columns: Size,
    asset_step: f64,
    time_step: f64,
    price: Option<f64>,
}

/// Write one line per asset step, one tab-separated column per time step,
/// three decimals.
pub fn write_grid<W: Write>(grid: &FdGrid, out: &mut W) -> std::io::Result<()> {
    let values = grid.values();
    for i in 0..values.nrows() {
        let line: Vec<String> = values.row(i).iter().map(|v| format!("{v:.3}")).collect();
        writeln!(out, "{}", line.join("\t"))?;
    }
    out.flush()
}

/// Run the fd-grid command
pub fn run(args: &FdGridArgs, format: OutputFormat) -> Result<()> {
    let m = &args.market;
    let grid = finite_differences::price_american(
        m.volatility,
        m.rate,
        m.option_type,
        m.strike,
        m.expiry,
        args.american,
        args.asset_steps,
    )?;

    let mut out = BufWriter::new(File::create(&args.output)?);
    write_grid(&grid, &mut out)?;
    info!(path = %args.output.display(), "wrote finite-difference grid");

    let report = FdGridReport {
        output: args.output.display().to_string(),
        rows: grid.asset_steps() + 1,
        columns: grid.time_steps() + 1,
        asset_step: grid.asset_step(),
        time_step: grid.time_step(),
        price: grid.price_at(m.spot).ok(),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("Wrote {} x {} grid to {}", report.rows, report.columns, report.output);
            println!("  h = {:.4}  dt = {:.6}", report.asset_step, report.time_step);
            match report.price {
                Some(price) => println!("  value at S = {}: {price:.6}", m.spot),
                None => println!("  S = {} lies outside the grid", m.spot),
            }
        }
    }
    Ok(())
}
