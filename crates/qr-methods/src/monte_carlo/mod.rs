//! Monte Carlo pricing of European options under risk-neutral GBM.
//!
//! Each trial evolves the asset with the Euler–Maruyama step
//! `S ← S + rSΔt + σS√Δt·φ`, `φ ~ N(0, 1)`, and records the payoff at
//! maturity. The price is the discounted mean payoff.
//!
//! # Overview
//!
//! * [`GbmEuler`]: the discretized process
//! * [`MonteCarloConfig`]: trial count, seed and stream partition
//! * [`MonteCarloEngine`]: parallel and sequential estimators
//! * [`McPrice`]: estimate with its standard error
//!
//! # Parallelism
//!
//! Trials are split into `streams` contiguous chunks. The partition depends
//! only on the configuration, never on the size of the rayon pool. Each
//! chunk owns its random source and a private [`Statistics`]; the partial
//! results are merged in chunk order once every chunk has finished, so a
//! seeded run is bit-for-bit reproducible on any number of threads.

use qr_core::{
    ensure, ensure_domain, OptionType, PlainVanillaPayoff, Price, Rate, Real, Result, Size, Time,
    Volatility,
};
use qr_math::{stream_seed, InverseCumulativeNormalRng, NormalDeviateSource, Statistics};
use rayon::prelude::*;
use tracing::debug;

// ─── Process ──────────────────────────────────────────────────────────────────

/// Euler–Maruyama discretization of `dS = rS dt + σS dW`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmEuler {
    spot: Real,
    rate: Rate,
    volatility: Volatility,
    dt: Time,
    steps: Size,
}

impl GbmEuler {
    /// Process starting at `spot` with `steps` steps of length `dt`.
    pub fn new(spot: Real, rate: Rate, volatility: Volatility, dt: Time, steps: Size) -> Result<Self> {
        ensure!(spot.is_finite() && spot > 0.0, "spot must be positive, got {spot}");
        ensure!(rate.is_finite(), "interest rate must be finite, got {rate}");
        ensure!(
            volatility.is_finite() && volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        ensure!(dt.is_finite() && dt > 0.0, "time step must be positive, got {dt}");
        ensure!(steps >= 1, "at least 1 time step is required");
        Ok(Self {
            spot,
            rate,
            volatility,
            dt,
            steps,
        })
    }

    /// Initial asset price.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Risk-free rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Number of steps per path.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Simulated horizon `Δt·M`.
    pub fn maturity(&self) -> Time {
        self.dt * self.steps as Real
    }

    /// Discount factor over the simulated horizon.
    pub fn discount(&self) -> Real {
        (-self.rate * self.maturity()).exp()
    }

    /// Simulate one path and return the asset price at maturity.
    ///
    /// Draws exactly `steps` deviates from `source`.
    pub fn terminal<S: NormalDeviateSource + ?Sized>(&self, source: &mut S) -> Real {
        let drift = self.rate * self.dt;
        let diffusion = self.volatility * self.dt.sqrt();
        let mut s = self.spot;
        for _ in 0..self.steps {
            let phi = source.next_deviate();
            s += s * drift + s * diffusion * phi;
        }
        s
    }
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Monte Carlo run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloConfig {
    /// Number of simulated paths.
    pub trials: Size,
    /// Base seed of the default random streams.
    pub seed: u64,
    /// Number of independent chunks the trials are split into.
    pub streams: Size,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 250,
            seed: 42,
            streams: 16,
        }
    }
}

impl MonteCarloConfig {
    /// Set the number of trials.
    pub fn with_trials(mut self, trials: Size) -> Self {
        self.trials = trials;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of streams.
    pub fn with_streams(mut self, streams: Size) -> Self {
        self.streams = streams;
        self
    }

    /// Check that the configuration can run.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.trials >= 1, "at least 1 trial is required");
        ensure!(self.streams >= 1, "at least 1 stream is required");
        Ok(())
    }
}

// ─── Result ───────────────────────────────────────────────────────────────────

/// A Monte Carlo estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct McPrice {
    /// Discounted mean payoff.
    pub price: Price,
    /// Standard error of `price`; zero for a single trial.
    pub std_error: Real,
    /// Number of simulated paths.
    pub trials: Size,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

/// European option pricer over [`GbmEuler`] paths.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    config: MonteCarloConfig,
}

impl MonteCarloEngine {
    /// Create an engine, validating `config`.
    pub fn new(config: MonteCarloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration.
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Parallel estimate with one Mersenne-Twister stream per chunk, seeded
    /// with [`stream_seed`]`(seed, chunk)`.
    pub fn price_european(
        &self,
        option_type: OptionType,
        strike: Real,
        process: &GbmEuler,
    ) -> Result<McPrice> {
        let seed = self.config.seed;
        self.price_european_with(option_type, strike, process, |stream| {
            InverseCumulativeNormalRng::new(stream_seed(seed, stream as u64))
        })
    }

    /// Parallel estimate; `make_source(chunk)` builds the deviate source of
    /// each chunk on the worker that runs it.
    pub fn price_european_with<F, S>(
        &self,
        option_type: OptionType,
        strike: Real,
        process: &GbmEuler,
        make_source: F,
    ) -> Result<McPrice>
    where
        F: Fn(Size) -> S + Sync,
        S: NormalDeviateSource,
    {
        ensure_strike(strike)?;
        let payoff = PlainVanillaPayoff::new(option_type, strike);
        let chunks = split_trials(self.config.trials, self.config.streams);
        debug!(
            trials = self.config.trials,
            chunks = chunks.len(),
            steps = process.steps(),
            threads = rayon::current_num_threads(),
            %option_type,
            "parallel Monte Carlo"
        );

        let partials: Vec<Statistics> = chunks
            .par_iter()
            .map(|&(stream, trials)| {
                let mut source = make_source(stream);
                let mut stats = Statistics::new();
                for _ in 0..trials {
                    stats.add(payoff.value(process.terminal(&mut source)));
                }
                stats
            })
            .collect();

        let mut total = Statistics::new();
        for partial in &partials {
            total.merge(partial);
        }
        finish(&total, process)
    }

    /// Single-threaded estimate drawing every deviate from `source`.
    pub fn price_european_sequential<S: NormalDeviateSource + ?Sized>(
        &self,
        option_type: OptionType,
        strike: Real,
        process: &GbmEuler,
        source: &mut S,
    ) -> Result<McPrice> {
        ensure_strike(strike)?;
        let payoff = PlainVanillaPayoff::new(option_type, strike);
        debug!(
            trials = self.config.trials,
            steps = process.steps(),
            %option_type,
            "sequential Monte Carlo"
        );

        let mut stats = Statistics::new();
        for _ in 0..self.config.trials {
            stats.add(payoff.value(process.terminal(&mut *source)));
        }
        finish(&stats, process)
    }
}

fn ensure_strike(strike: Real) -> Result<()> {
    ensure!(
        strike.is_finite() && strike >= 0.0,
        "strike must be non-negative, got {strike}"
    );
    Ok(())
}

fn finish(stats: &Statistics, process: &GbmEuler) -> Result<McPrice> {
    let mean = stats.mean().unwrap_or(0.0);
    ensure_domain!(mean.is_finite(), "mean payoff is not finite: {mean}");
    let df = process.discount();
    Ok(McPrice {
        price: df * mean,
        std_error: df * stats.error_estimate().unwrap_or(0.0),
        trials: stats.samples(),
    })
}

/// Split `trials` into `chunks` contiguous `(chunk index, trial count)`
/// pairs, sizes differing by at most one. Empty chunks are dropped.
fn split_trials(trials: Size, chunks: Size) -> Vec<(Size, Size)> {
    let chunks = chunks.max(1);
    let base = trials / chunks;
    let rem = trials % chunks;
    (0..chunks)
        .map(|i| (i, if i < rem { base + 1 } else { base }))
        .filter(|&(_, n)| n > 0)
        .collect()
}
