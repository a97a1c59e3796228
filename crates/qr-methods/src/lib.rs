//! # qr-methods
//!
//! Numerical option-pricing engines under a lognormal asset model.
//!
//! Three independent, stateless engines, each a pure function from scalar
//! market/contract parameters to a price:
//!
//! * [`finite_differences`]: explicit finite-difference solver of the
//!   Black-Scholes PDE on a uniform asset grid, returning the full value
//!   surface or today's curve with local Greeks
//! * [`lattice`]: recombining binomial tree with European and
//!   early-exercise (American) backward induction
//! * [`monte_carlo`]: Euler–Maruyama simulation of risk-neutral GBM paths,
//!   run in parallel over independent random streams
//!
//! [`analytic`] holds the closed-form Black-Scholes price used as the
//! correctness reference.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Closed-form Black-Scholes reference price.
pub mod analytic;

/// Explicit finite-difference solver for the Black-Scholes PDE.
pub mod finite_differences;

/// Recombining binomial lattice.
pub mod lattice;

/// Monte Carlo simulation of terminal payoffs.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use analytic::black_scholes_price;
pub use finite_differences::{FdGreeksRow, FdGreeksTable, FdGrid};
pub use lattice::{AmericanLattice, BinomialParameters};
pub use monte_carlo::{GbmEuler, McPrice, MonteCarloConfig, MonteCarloEngine};
