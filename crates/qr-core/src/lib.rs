//! # qr-core
//!
//! Core types, option payoffs, and error definitions for quantrecipes-rs.
//!
//! This crate provides the building blocks shared by the pricing engines –
//! scalar type aliases, the error hierarchy with its `ensure!` /
//! `ensure_domain!` guards, and the plain-vanilla option payoff.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_domain!` macros.
pub mod errors;

/// Option type and plain-vanilla payoff.
pub mod payoff;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices and step counts.
pub type Size = usize;

/// A continuously-compounded rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use payoff::{OptionType, PlainVanillaPayoff};
