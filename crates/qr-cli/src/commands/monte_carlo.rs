//! Monte Carlo command

use clap::{Args, ValueEnum};
use qr_core::{OptionType, Real, Size};
use qr_math::{stream_seed, BoxMullerRng, InverseCumulativeNormalRng, ZigguratNormalRng};
use qr_methods::{GbmEuler, McPrice, MonteCarloConfig, MonteCarloEngine};
use serde::Serialize;
use tracing::info;

use super::{print_json, MarketArgs, OutputFormat};
use crate::Result;

/// Generator of the normal deviates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviateSource {
    /// Mersenne Twister through the inverse normal CDF
    InverseNormal,
    /// Polar Box-Muller
    BoxMuller,
    /// Ziggurat
    Ziggurat,
}

/// Arguments of `quantrecipes monte-carlo`.
#[derive(Debug, Clone, Args)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of simulated paths
    #[arg(short = 'n', long, default_value_t = MonteCarloConfig::default().trials)]
    pub trials: Size,

    /// Time steps per path
    #[arg(long, default_value_t = 20)]
    pub steps: Size,

    /// Base random seed
    #[arg(long, default_value_t = MonteCarloConfig::default().seed)]
    pub seed: u64,

    /// Number of independent trial chunks
    #[arg(long, default_value_t = MonteCarloConfig::default().streams)]
    pub streams: Size,

    /// Run on the calling thread with a single random stream
    #[arg(long)]
    pub sequential: bool,

    /// Normal deviate generator
    #[arg(long, value_enum, default_value_t = DeviateSource::InverseNormal)]
    pub source: DeviateSource,
}

#[derive(Debug, Serialize)]
struct MonteCarloReport {
    option_type: OptionType,
    mode: &'static str,
    source: DeviateSource,
    steps: Size,
    streams: Size,
    seed: u64,
    #[serde(flatten)]
    estimate: McPrice,
    black_scholes: Real,
}

fn estimate(args: &MonteCarloArgs, engine: &MonteCarloEngine, process: &GbmEuler) -> Result<McPrice> {
    let m = &args.market;
    let seed = args.seed;
    let price = match (args.sequential, args.source) {
        (true, DeviateSource::InverseNormal) => {
            let mut source = InverseCumulativeNormalRng::new(seed);
            engine.price_european_sequential(m.option_type, m.strike, process, &mut source)?
        }
        (true, DeviateSource::BoxMuller) => {
            let mut source = BoxMullerRng::new(seed);
            engine.price_european_sequential(m.option_type, m.strike, process, &mut source)?
        }
        (true, DeviateSource::Ziggurat) => {
            let mut source = ZigguratNormalRng::new(seed);
            engine.price_european_sequential(m.option_type, m.strike, process, &mut source)?
        }
        (false, DeviateSource::InverseNormal) => engine.price_european(m.option_type, m.strike, process)?,
        (false, DeviateSource::BoxMuller) => engine.price_european_with(m.option_type, m.strike, process, |s| {
            BoxMullerRng::new(stream_seed(seed, s as u64))
        })?,
        (false, DeviateSource::Ziggurat) => engine.price_european_with(m.option_type, m.strike, process, |s| {
            ZigguratNormalRng::new(stream_seed(seed, s as u64))
        })?,
    };
    Ok(price)
}

/// Run the monte-carlo command
pub fn run(args: &MonteCarloArgs, format: OutputFormat) -> Result<()> {
    let m = &args.market;
    let config = MonteCarloConfig::default()
        .with_trials(args.trials)
        .with_seed(args.seed)
        .with_streams(args.streams);
    let engine = MonteCarloEngine::new(config)?;
    let process = GbmEuler::new(m.spot, m.rate, m.volatility, m.expiry / args.steps.max(1) as Real, args.steps)?;

    let estimate = estimate(args, &engine, &process)?;
    let mode = if args.sequential { "sequential" } else { "parallel" };
    info!(mode, trials = estimate.trials, price = estimate.price, "monte carlo priced");

    let report = MonteCarloReport {
        option_type: m.option_type,
        mode,
        source: args.source,
        steps: args.steps,
        streams: if args.sequential { 1 } else { args.streams },
        seed: args.seed,
        estimate,
        black_scholes: m.black_scholes(),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!(
                "Monte Carlo ({mode}, {} trials x {} steps, {:?})",
                report.estimate.trials, report.steps, report.source
            );
            println!(
                "  {} price    {:>12.6} +/- {:.6}",
                report.option_type, report.estimate.price, report.estimate.std_error
            );
            println!("  Black-Scholes  {:>12.6}", report.black_scholes);
        }
    }
    Ok(())
}
