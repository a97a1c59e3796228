//! Error types for quantrecipes-rs.
//!
//! Every engine reports failures through a single `thiserror`-derived enum.
//! Pricing errors are deterministic configuration errors: they are raised
//! before or during setup of a single pricing call and never retried.
//! The `ensure!` and `ensure_domain!` macros defined here are the guards
//! used at the top of each engine entry point.

use thiserror::Error;

/// The top-level error type used throughout quantrecipes-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An input parameter is outside the range the engine accepts: a
    /// non-positive step count, volatility or time, or a degenerate
    /// rate/volatility combination.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The inputs are individually valid, but the numerical scheme cannot
    /// be set up with them (e.g. a negative discriminant or a risk-neutral
    /// probability outside `(0, 1)`).
    #[error("numerical domain error: {0}")]
    NumericalDomain(String),
}

impl Error {
    /// Return `true` for [`Error::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }

    /// Return `true` for [`Error::NumericalDomain`].
    pub fn is_numerical_domain(&self) -> bool {
        matches!(self, Error::NumericalDomain(_))
    }
}

/// Shorthand `Result` type used throughout quantrecipes-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qr_core::{ensure, errors::Error};
/// fn positive(x: f64) -> qr_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).unwrap_err().is_invalid_parameter());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::NumericalDomain(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use qr_core::{ensure_domain, errors::Error};
/// fn root(x: f64) -> qr_core::errors::Result<f64> {
///     ensure_domain!(x >= 0.0, "cannot take the square root of {x}");
///     Ok(x.sqrt())
/// }
/// assert!(root(4.0).is_ok());
/// assert!(root(-1.0).unwrap_err().is_numerical_domain());
/// ```
#[macro_export]
macro_rules! ensure_domain {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::NumericalDomain(
                format!($($msg)*)
            ));
        }
    };
}
