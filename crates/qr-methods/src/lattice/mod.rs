//! Recombining binomial lattice for vanilla options.
//!
//! One step multiplies the asset price by `u` (probability `p`) or by
//! `d = 1/u` (probability `1 − p`), so node `j` of level `i` carries
//! `S₀·u^j·d^(i−j)` regardless of path. Jump sizes come from matching the
//! first two moments of the risk-neutral lognormal step:
//!
//! * `A = e^{(r+σ²)Δt}`, `B = ½(e^{−rΔt} + A)`
//! * `u = B + √(B² − 1)`, `d = 1/u`
//! * `p = (e^{rΔt} − d) / (u − d)`
//!
//! # Overview
//!
//! * [`BinomialParameters`]: validated step parameters for a given tree
//! * [`price_european`] / [`price_european_call`]: in-place pricing on two
//!   one-dimensional arrays
//! * [`price_american`] / [`price_american_call`]: early-exercise induction
//!   over the full tree, see [`AmericanLattice`]

mod american;

pub use american::AmericanLattice;

use qr_core::{
    ensure, ensure_domain, OptionType, PlainVanillaPayoff, Price, Rate, Real, Result, Size, Time,
    Volatility,
};
use tracing::debug;

// ─── Parameters ───────────────────────────────────────────────────────────────

/// Per-step parameters of a recombining binomial tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialParameters {
    /// Number of time steps `N`.
    pub steps: Size,
    /// Step length `Δt = T/N`.
    pub dt: Time,
    /// One-step discount factor `e^{−rΔt}`.
    pub discount: Real,
    /// Up factor `u`.
    pub up: Real,
    /// Down factor `d = 1/u`.
    pub down: Real,
    /// Risk-neutral probability of an up move.
    pub probability: Real,
}

impl BinomialParameters {
    /// Derive the tree parameters for `steps` steps over `time_to_expiry`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](qr_core::Error::InvalidParameter) for zero
    /// steps, non-positive volatility or expiry, or a non-finite rate;
    /// [`Error::NumericalDomain`](qr_core::Error::NumericalDomain) when the
    /// moment match has no real solution or collapses to `u = d`, which
    /// happens once `σ²Δt` vanishes in floating point. In exact arithmetic
    /// `B ≥ 1` and `d < e^{rΔt} < u`, so the `p ∉ (0, 1)` check only catches
    /// rounding on such near-degenerate trees.
    pub fn new(volatility: Volatility, rate: Rate, time_to_expiry: Time, steps: Size) -> Result<Self> {
        ensure!(steps >= 1, "at least 1 time step is required");
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive, got {volatility}"
        );
        ensure!(
            time_to_expiry.is_finite() && time_to_expiry > 0.0,
            "time to expiry must be positive, got {time_to_expiry}"
        );
        ensure!(rate.is_finite(), "interest rate must be finite, got {rate}");

        let dt = time_to_expiry / steps as Real;
        let discount = (-rate * dt).exp();
        let a = ((rate + volatility * volatility) * dt).exp();
        let b = 0.5 * (discount + a);
        let b2_minus_one = b * b - 1.0;
        ensure_domain!(
            b2_minus_one >= 0.0,
            "B² − 1 = {b2_minus_one} is negative; no real up factor"
        );

        let up = b + b2_minus_one.sqrt();
        let down = 1.0 / up;
        ensure_domain!(up > down, "degenerate tree: u = {up}, d = {down}");

        let probability = ((rate * dt).exp() - down) / (up - down);
        ensure_domain!(
            probability > 0.0 && probability < 1.0,
            "risk-neutral probability {probability} lies outside (0, 1)"
        );

        Ok(Self {
            steps,
            dt,
            discount,
            up,
            down,
            probability,
        })
    }

    /// Whether an up move followed by a down move returns to the same node.
    pub fn recombines(&self) -> bool {
        (self.up * self.down - 1.0).abs() <= 4.0 * Real::EPSILON
    }

    /// Discounted expectation of the two successors of a node.
    #[inline]
    pub(crate) fn rollback(&self, up_value: Real, down_value: Real) -> Real {
        self.discount * (self.probability * up_value + (1.0 - self.probability) * down_value)
    }
}

fn ensure_contract(spot: Real, strike: Real) -> Result<()> {
    ensure!(spot.is_finite() && spot > 0.0, "spot must be positive, got {spot}");
    ensure!(
        strike.is_finite() && strike > 0.0,
        "strike must be positive, got {strike}"
    );
    Ok(())
}

// ─── European ─────────────────────────────────────────────────────────────────

/// European option price on an `N`-step tree.
///
/// Uses two arrays of length `N + 1`, overwritten in place level by level.
pub fn price_european(
    option_type: OptionType,
    spot: Real,
    volatility: Volatility,
    rate: Rate,
    strike: Real,
    time_to_expiry: Time,
    steps: Size,
) -> Result<Price> {
    ensure_contract(spot, strike)?;
    let params = BinomialParameters::new(volatility, rate, time_to_expiry, steps)?;
    debug!(
        steps,
        up = params.up,
        probability = params.probability,
        %option_type,
        "binomial European lattice"
    );

    let mut prices = vec![0.0; steps + 1];
    prices[0] = spot;
    for i in 1..=steps {
        for j in (1..=i).rev() {
            prices[j] = params.up * prices[j - 1];
        }
        prices[0] *= params.down;
    }

    let payoff = PlainVanillaPayoff::new(option_type, strike);
    let mut values: Vec<Real> = prices.iter().map(|&s| payoff.value(s)).collect();
    for i in (1..=steps).rev() {
        for j in 0..i {
            values[j] = params.rollback(values[j + 1], values[j]);
        }
    }

    Ok(values[0])
}

/// European call price on an `N`-step tree.
pub fn price_european_call(
    spot: Real,
    volatility: Volatility,
    rate: Rate,
    strike: Real,
    time_to_expiry: Time,
    steps: Size,
) -> Result<Price> {
    price_european(OptionType::Call, spot, volatility, rate, strike, time_to_expiry, steps)
}

// ─── American ─────────────────────────────────────────────────────────────────

/// American option price on an `N`-step tree.
pub fn price_american(
    option_type: OptionType,
    spot: Real,
    volatility: Volatility,
    rate: Rate,
    strike: Real,
    time_to_expiry: Time,
    steps: Size,
) -> Result<Price> {
    AmericanLattice::build(option_type, spot, volatility, rate, strike, time_to_expiry, steps)
        .map(|lattice| lattice.price())
}

/// American call price on an `N`-step tree.
///
/// Without dividends early exercise of a call is never optimal, so this
/// agrees with [`price_european_call`] up to rounding.
pub fn price_american_call(
    spot: Real,
    volatility: Volatility,
    rate: Rate,
    strike: Real,
    time_to_expiry: Time,
    steps: Size,
) -> Result<Price> {
    price_american(OptionType::Call, spot, volatility, rate, strike, time_to_expiry, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::black_scholes_price;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn parameters_for_reference_tree() {
        let p = BinomialParameters::new(0.20, 0.05, 1.0, 20).unwrap();
        assert_abs_diff_eq!(p.dt, 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(p.discount, 0.997503, epsilon = 1e-6);
        assert_abs_diff_eq!(p.up, 1.045887, epsilon = 1e-6);
        assert_abs_diff_eq!(p.down, 0.956126, epsilon = 1e-6);
        assert_abs_diff_eq!(p.probability, 0.516672, epsilon = 1e-6);
        assert!(p.recombines());
        assert!(p.up > 1.0 && p.down < 1.0);
    }

    #[test]
    fn reference_scenario_prices() {
        let call = price_european_call(100.0, 0.2, 0.05, 100.0, 1.0, 20).unwrap();
        let put = price_european(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 20).unwrap();
        assert_abs_diff_eq!(call, 10.37517, epsilon = 1e-4);
        assert_abs_diff_eq!(put, 5.49811, epsilon = 1e-4);
        let bs = black_scholes_price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
        assert!((call - bs).abs() < 0.25);
    }

    #[test]
    fn converges_to_black_scholes() {
        for option_type in [OptionType::Call, OptionType::Put] {
            let bs = black_scholes_price(option_type, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
            let tree = price_european(option_type, 100.0, 0.2, 0.05, 100.0, 1.0, 200).unwrap();
            assert!((tree - bs).abs() < 0.01 * bs, "{option_type}: {tree} vs {bs}");
        }
    }

    #[test]
    fn boundary_sanity() {
        let otm = price_european_call(50.0, 0.2, 0.05, 100.0, 1.0, 200).unwrap();
        assert!(otm < 0.01);
        let itm = price_european_call(200.0, 0.2, 0.05, 100.0, 1.0, 200).unwrap();
        assert_abs_diff_eq!(itm, 200.0 - 100.0 * (-0.05_f64).exp(), epsilon = 0.01);
    }

    #[test]
    fn american_call_equals_european_call() {
        let euro = price_european_call(100.0, 0.2, 0.05, 100.0, 1.0, 100).unwrap();
        let amer = price_american_call(100.0, 0.2, 0.05, 100.0, 1.0, 100).unwrap();
        assert_abs_diff_eq!(amer, euro, epsilon = 1e-9);
    }

    #[test]
    fn american_put_carries_early_exercise_premium() {
        let euro = price_european(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 20).unwrap();
        let amer = price_american(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 20).unwrap();
        assert_abs_diff_eq!(amer, 6.07118, epsilon = 1e-4);
        assert!(amer > euro + 0.5);

        // Reference value ≈ 6.090 for S=K=100, r=5%, σ=20%, T=1
        let fine = price_american(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 500).unwrap();
        assert_abs_diff_eq!(fine, 6.090, epsilon = 0.01);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(BinomialParameters::new(0.2, 0.05, 1.0, 0).unwrap_err().is_invalid_parameter());
        assert!(BinomialParameters::new(0.0, 0.05, 1.0, 10).unwrap_err().is_invalid_parameter());
        assert!(BinomialParameters::new(-0.2, 0.05, 1.0, 10).is_err());
        assert!(BinomialParameters::new(0.2, 0.05, 0.0, 10).is_err());
        assert!(BinomialParameters::new(0.2, Real::INFINITY, 1.0, 10).is_err());
        assert!(price_european_call(0.0, 0.2, 0.05, 100.0, 1.0, 10).is_err());
        assert!(price_european_call(100.0, 0.2, 0.05, -1.0, 1.0, 10).is_err());
        assert!(price_american_call(Real::NAN, 0.2, 0.05, 100.0, 1.0, 10).is_err());
    }

    #[test]
    fn vanishing_volatility_collapses_the_tree() {
        // exp(σ²Δt) rounds to 1 and with r = 0 both moves become 1.
        let err = BinomialParameters::new(1e-12, 0.0, 1.0, 1).unwrap_err();
        assert!(err.is_numerical_domain());
        assert!(price_european_call(100.0, 1e-12, 0.0, 100.0, 1.0, 1).unwrap_err().is_numerical_domain());
        assert!(price_american(OptionType::Put, 100.0, 1e-12, 0.0, 100.0, 1.0, 1)
            .unwrap_err()
            .is_numerical_domain());
    }

    #[test]
    fn near_degenerate_trees_keep_probability_inside_unit_interval() {
        for rate in [-1.0, -0.1, 0.05, 0.1, 1.0] {
            for expiry in [0.1, 1.0] {
                match BinomialParameters::new(1e-12, rate, expiry, 1) {
                    Ok(params) => assert!(params.probability > 0.0 && params.probability < 1.0),
                    Err(err) => assert!(err.is_numerical_domain(), "r = {rate}: {err}"),
                }
            }
        }
    }

    #[test]
    fn negative_rate_is_accepted_when_tree_is_valid() {
        let p = BinomialParameters::new(0.3, -0.01, 0.5, 50).unwrap();
        assert!(p.probability > 0.0 && p.probability < 1.0);
    }

    proptest! {
        #[test]
        fn up_times_down_is_one(
            sigma in 0.01..1.0_f64,
            r in -0.05..0.2_f64,
            t in 0.05..5.0_f64,
            steps in 1usize..500,
        ) {
            let p = BinomialParameters::new(sigma, r, t, steps).unwrap();
            prop_assert!(p.recombines());
            prop_assert!((p.up * p.down - 1.0).abs() <= 4.0 * Real::EPSILON);
        }

        #[test]
        fn put_call_parity(
            spot in 60.0..140.0_f64,
            sigma in 0.1..0.6_f64,
            r in 0.0..0.1_f64,
            t in 0.1..2.0_f64,
        ) {
            let k = 100.0;
            let call = price_european(OptionType::Call, spot, sigma, r, k, t, 64).unwrap();
            let put = price_european(OptionType::Put, spot, sigma, r, k, t, 64).unwrap();
            let forward = spot - k * (-r * t).exp();
            prop_assert!((call - put - forward).abs() < 1e-8, "C − P = {}, forward = {}", call - put, forward);
        }
    }
}
