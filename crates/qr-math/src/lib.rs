//! # qr-math
//!
//! Mathematical collaborators of the pricing engines: the standard normal
//! distribution, sources of standard-normal random deviates (over the
//! `rand`, `rand_distr` and `rand_mt` crates), and a mergeable statistics
//! accumulator for Monte Carlo trial outcomes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Random number generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use random_numbers::{
    stream_seed, BoxMullerRng, InverseCumulativeNormalRng, MersenneTwisterUniformRng,
    NormalDeviateSource, ZigguratNormalRng,
};
pub use statistics::Statistics;
