//! Explicit finite-difference solver for the Black-Scholes PDE.
//!
//! The asset axis is a uniform grid `S_i = i·h`, `h = 2K/N`, spanning
//! `[0, 2K]`. The time axis counts steps of *time to expiry*: column
//! `k = 0` holds the payoff at expiry and column `k = M` holds today's
//! values, so increasing `k` moves backward in calendar time.
//!
//! # Overview
//!
//! * [`price_european`] / [`price_american`]: full `(N+1) × (M+1)` value
//!   surface as an [`FdGrid`]
//! * [`price_american_compact`]: two rolling slices only; returns today's
//!   curve with delta, gamma and theta as an [`FdGreeksTable`]

mod explicit;

pub use explicit::{price_american, price_american_compact, price_european, MAX_GRID_CELLS};

use nalgebra::DMatrix;
use qr_core::{ensure, Real, Result, Size, Time};

// ─── Value surface ────────────────────────────────────────────────────────────

/// Option values on the `(asset step, time-to-expiry step)` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FdGrid {
    values: DMatrix<Real>,
    asset_step: Real,
    time_step: Time,
}

impl FdGrid {
    pub(crate) fn new(values: DMatrix<Real>, asset_step: Real, time_step: Time) -> Self {
        Self {
            values,
            asset_step,
            time_step,
        }
    }

    /// Number of asset steps `N` (the grid has `N + 1` rows).
    pub fn asset_steps(&self) -> Size {
        self.values.nrows() - 1
    }

    /// Number of time steps `M` (the grid has `M + 1` columns).
    pub fn time_steps(&self) -> Size {
        self.values.ncols() - 1
    }

    /// Asset price spacing `h`.
    pub fn asset_step(&self) -> Real {
        self.asset_step
    }

    /// Time step `Δt = T / M`.
    pub fn time_step(&self) -> Time {
        self.time_step
    }

    /// Asset price of row `i`.
    pub fn asset_price(&self, i: Size) -> Real {
        i as Real * self.asset_step
    }

    /// Time to expiry of column `k`.
    pub fn time_to_expiry(&self, k: Size) -> Time {
        k as Real * self.time_step
    }

    /// Option value at row `i`, column `k`.
    pub fn value(&self, i: Size, k: Size) -> Real {
        self.values[(i, k)]
    }

    /// Column `k = 0`: the payoff at expiry.
    pub fn payoff(&self) -> Vec<Real> {
        self.values.column(0).iter().copied().collect()
    }

    /// Column `k = M`: today's option values.
    pub fn today(&self) -> Vec<Real> {
        self.values.column(self.time_steps()).iter().copied().collect()
    }

    /// Today's value at `spot`, linearly interpolated between grid nodes.
    pub fn price_at(&self, spot: Real) -> Result<Real> {
        interpolate(&self.today(), self.asset_step, spot)
    }

    /// The dense value matrix, rows indexed by asset step.
    pub fn values(&self) -> &DMatrix<Real> {
        &self.values
    }
}

// ─── Today's curve with Greeks ────────────────────────────────────────────────

/// One asset node of today's curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FdGreeksRow {
    /// Asset price `S_i`.
    pub asset_price: Real,
    /// Payoff at `S_i`.
    pub payoff: Real,
    /// Today's option value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂t` in calendar time, from the Black-Scholes equation.
    pub theta: Real,
}

/// Today's curve plus delta/gamma/theta, one row per asset node.
#[derive(Debug, Clone, PartialEq)]
pub struct FdGreeksTable {
    rows: Vec<FdGreeksRow>,
    asset_step: Real,
    time_steps: Size,
    time_step: Time,
}

impl FdGreeksTable {
    /// Number of columns of [`FdGreeksTable::to_matrix`].
    pub const COLUMNS: Size = 6;

    /// All rows, ordered by asset price.
    pub fn rows(&self) -> &[FdGreeksRow] {
        &self.rows
    }

    /// Row `i`.
    pub fn row(&self, i: Size) -> Option<&FdGreeksRow> {
        self.rows.get(i)
    }

    /// Asset price spacing `h`.
    pub fn asset_step(&self) -> Real {
        self.asset_step
    }

    /// Number of time steps taken to reach today.
    pub fn time_steps(&self) -> Size {
        self.time_steps
    }

    /// Time step `Δt`.
    pub fn time_step(&self) -> Time {
        self.time_step
    }

    /// Today's value at `spot`, linearly interpolated between grid nodes.
    pub fn price_at(&self, spot: Real) -> Result<Real> {
        let values: Vec<Real> = self.rows.iter().map(|r| r.value).collect();
        interpolate(&values, self.asset_step, spot)
    }

    /// `(N+1) × 6` matrix with columns asset price, payoff, value, delta,
    /// gamma, theta.
    pub fn to_matrix(&self) -> DMatrix<Real> {
        DMatrix::from_fn(self.rows.len(), Self::COLUMNS, |i, j| {
            let r = &self.rows[i];
            match j {
                0 => r.asset_price,
                1 => r.payoff,
                2 => r.value,
                3 => r.delta,
                4 => r.gamma,
                _ => r.theta,
            }
        })
    }
}

fn interpolate(values: &[Real], h: Real, spot: Real) -> Result<Real> {
    let n = values.len() - 1;
    let upper = n as Real * h;
    ensure!(
        spot.is_finite() && (0.0..=upper).contains(&spot),
        "spot {spot} lies outside the grid [0, {upper}]"
    );
    let x = spot / h;
    let idx = (x.floor() as Size).min(n - 1);
    let frac = x - idx as Real;
    Ok(values[idx] * (1.0 - frac) + values[idx + 1] * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_hits_nodes_and_midpoints() {
        let values = [0.0, 1.0, 4.0, 9.0];
        assert_eq!(interpolate(&values, 2.0, 0.0).unwrap(), 0.0);
        assert_eq!(interpolate(&values, 2.0, 4.0).unwrap(), 4.0);
        assert_eq!(interpolate(&values, 2.0, 5.0).unwrap(), 6.5);
        assert_eq!(interpolate(&values, 2.0, 6.0).unwrap(), 9.0);
        assert!(interpolate(&values, 2.0, 6.5).is_err());
        assert!(interpolate(&values, 2.0, -0.1).is_err());
    }
}
