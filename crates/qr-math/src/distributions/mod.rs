//! Probability distributions.
//!
//! Only the standard normal is needed by the engines: its density and CDF
//! back the analytic reference price, and its inverse CDF turns uniform
//! deviates into normal ones.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
