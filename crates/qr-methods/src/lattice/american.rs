//! Early-exercise backward induction over a fully retained tree.

use super::{ensure_contract, BinomialParameters};
use nalgebra::DMatrix;
use qr_core::{OptionType, PlainVanillaPayoff, Price, Rate, Real, Result, Size, Time, Volatility};
use tracing::debug;

/// A solved American binomial tree.
///
/// Both trees are stored as `(N+1) × (N+1)` matrices indexed
/// `[node, level]`; only entries with `node ≤ level` are meaningful.
#[derive(Debug, Clone)]
pub struct AmericanLattice {
    params: BinomialParameters,
    payoff: PlainVanillaPayoff,
    prices: DMatrix<Real>,
    values: DMatrix<Real>,
}

impl AmericanLattice {
    /// Build the price tree and run the early-exercise induction from
    /// level `N` down to the root.
    pub fn build(
        option_type: OptionType,
        spot: Real,
        volatility: Volatility,
        rate: Rate,
        strike: Real,
        time_to_expiry: Time,
        steps: Size,
    ) -> Result<Self> {
        ensure_contract(spot, strike)?;
        let params = BinomialParameters::new(volatility, rate, time_to_expiry, steps)?;
        let payoff = PlainVanillaPayoff::new(option_type, strike);
        let n = steps;

        let mut prices = DMatrix::zeros(n + 1, n + 1);
        prices[(0, 0)] = spot;
        for i in 1..=n {
            for j in 1..=i {
                prices[(j, i)] = params.up * prices[(j - 1, i - 1)];
            }
            prices[(0, i)] = params.down * prices[(0, i - 1)];
        }

        let mut values = DMatrix::zeros(n + 1, n + 1);
        for j in 0..=n {
            values[(j, n)] = payoff.value(prices[(j, n)]);
        }
        let mut exercised = 0usize;
        for i in (1..=n).rev() {
            for j in 0..i {
                let hold = params.rollback(values[(j + 1, i)], values[(j, i)]);
                let exercise = payoff.value(prices[(j, i - 1)]);
                if exercise > hold {
                    exercised += 1;
                }
                values[(j, i - 1)] = hold.max(exercise);
            }
        }

        debug!(
            steps,
            exercised_nodes = exercised,
            %option_type,
            "binomial American lattice"
        );

        Ok(Self {
            params,
            payoff,
            prices,
            values,
        })
    }

    /// Option value at the root.
    pub fn price(&self) -> Price {
        self.values[(0, 0)]
    }

    /// Number of levels below the root.
    pub fn steps(&self) -> Size {
        self.params.steps
    }

    /// The tree parameters.
    pub fn parameters(&self) -> &BinomialParameters {
        &self.params
    }

    /// Asset price at `node` of `level`, `None` when `node > level`.
    pub fn asset_price(&self, node: Size, level: Size) -> Option<Real> {
        self.in_tree(node, level).then(|| self.prices[(node, level)])
    }

    /// Option value at `node` of `level`, `None` when `node > level`.
    pub fn value(&self, node: Size, level: Size) -> Option<Real> {
        self.in_tree(node, level).then(|| self.values[(node, level)])
    }

    /// Whether the holder exercises at `node` of `level`, i.e. the node
    /// value is its positive intrinsic value. Always `false` at expiry and
    /// outside the tree.
    pub fn is_exercised(&self, node: Size, level: Size) -> bool {
        if !self.in_tree(node, level) || level == self.params.steps {
            return false;
        }
        let exercise = self.payoff.value(self.prices[(node, level)]);
        exercise > 0.0 && self.values[(node, level)] <= exercise
    }

    fn in_tree(&self, node: Size, level: Size) -> bool {
        level <= self.params.steps && node <= level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::price_european;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn tree_recombines() {
        let lattice = AmericanLattice::build(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 10).unwrap();
        for level in 0..=10 {
            let mut expected = 100.0 * lattice.parameters().down.powi(level as i32);
            for node in 0..=level {
                let s = lattice.asset_price(node, level).unwrap();
                assert_abs_diff_eq!(s, expected, epsilon = 1e-9);
                expected *= lattice.parameters().up / lattice.parameters().down;
            }
        }
        // two steps up-down returns to spot
        assert_abs_diff_eq!(lattice.asset_price(1, 2).unwrap(), 100.0, epsilon = 1e-12);
        assert!(lattice.asset_price(3, 2).is_none());
        assert!(lattice.value(0, 11).is_none());
    }

    #[test]
    fn every_node_dominates_its_payoff() {
        let lattice = AmericanLattice::build(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 50).unwrap();
        for level in 0..=50 {
            for node in 0..=level {
                let s = lattice.asset_price(node, level).unwrap();
                let v = lattice.value(node, level).unwrap();
                assert!(v >= (100.0 - s).max(0.0) - 1e-12);
            }
        }
    }

    #[test]
    fn deep_put_nodes_are_exercised() {
        let lattice = AmericanLattice::build(OptionType::Put, 100.0, 0.2, 0.05, 100.0, 1.0, 50).unwrap();
        // lowest node one step before expiry is deep in the money
        assert!(lattice.is_exercised(0, 49));
        // top node is far out of the money
        assert!(!lattice.is_exercised(49, 49));
        assert!(!lattice.is_exercised(0, 50));
        assert!(!lattice.is_exercised(60, 10));
    }

    #[test]
    fn calls_are_never_exercised_early() {
        let lattice = AmericanLattice::build(OptionType::Call, 100.0, 0.2, 0.05, 100.0, 1.0, 40).unwrap();
        for level in 0..40 {
            for node in 0..=level {
                assert!(!lattice.is_exercised(node, level), "node ({node}, {level})");
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn american_dominates_european(
            spot in 70.0..130.0_f64,
            sigma in 0.1..0.5_f64,
            r in 0.0..0.1_f64,
            steps in 1usize..80,
        ) {
            for option_type in [OptionType::Call, OptionType::Put] {
                let euro = price_european(option_type, spot, sigma, r, 100.0, 1.0, steps).unwrap();
                let amer = AmericanLattice::build(option_type, spot, sigma, r, 100.0, 1.0, steps).unwrap();
                prop_assert!(amer.price() >= euro - 1e-9);
            }
        }
    }
}
