//! # quantrecipes
//!
//! Option pricing by three numerical methods under the Black-Scholes model:
//! an explicit finite-difference PDE solver, a recombining binomial lattice
//! and a parallel Monte Carlo simulation.
//!
//! This crate is a **façade** that re-exports the underlying workspace
//! crates. Application code should depend on this crate rather than the
//! individual `qr-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantrecipes::core::OptionType;
//! use quantrecipes::methods::{black_scholes_price, lattice};
//!
//! let tree = lattice::price_european_call(100.0, 0.2, 0.05, 100.0, 1.0, 200)?;
//! let exact = black_scholes_price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
//! assert!((tree - exact).abs() < 0.01);
//! # Ok::<(), quantrecipes::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, payoffs and error definitions.
pub use qr_core as core;

/// Normal distribution, random deviate sources and statistics.
pub use qr_math as math;

/// Pricing engines (finite differences, binomial lattice, Monte Carlo).
pub use qr_methods as methods;
