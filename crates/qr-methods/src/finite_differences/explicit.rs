//! Explicit time stepping of the Black-Scholes PDE.
//!
//! Each step computes delta and gamma by central differences on the previous
//! slice, gets theta from the PDE
//! `θ = −½σ²S²Γ − rSΔ + rV`, and moves one step further from expiry with
//! `V ← V − Δt·θ`. The scheme is stable only for `Δt ≤ 1/(σ²N²)`; the step
//! is taken as 90% of that bound and shrunk so expiry lands on a grid line.

use super::{FdGreeksRow, FdGreeksTable, FdGrid};
use nalgebra::DMatrix;
use qr_core::{ensure, OptionType, PlainVanillaPayoff, Rate, Real, Result, Size, Time, Volatility};
use tracing::debug;

/// Fraction of the explicit-scheme stability bound used as the time step.
const STABILITY_FACTOR: Real = 0.9;

/// Largest grid accepted, counted as `(N + 1)·(M + 1)` cells. The full-grid
/// pricers hold every cell in memory and the compact one visits each once.
pub const MAX_GRID_CELLS: Size = 50_000_000;

/// Price a European option; returns the full value surface.
///
/// Rows are asset steps `0..=N`, columns are time-to-expiry steps `0..=M`.
pub fn price_european(
    volatility: Volatility,
    rate: Rate,
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    asset_steps: Size,
) -> Result<FdGrid> {
    price_american(
        volatility,
        rate,
        option_type,
        strike,
        time_to_expiry,
        false,
        asset_steps,
    )
}

/// Price an American option; returns the full value surface.
///
/// With `early_exercise = false` the result is identical to
/// [`price_european`].
pub fn price_american(
    volatility: Volatility,
    rate: Rate,
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    early_exercise: bool,
    asset_steps: Size,
) -> Result<FdGrid> {
    let scheme = ExplicitScheme::new(volatility, rate, option_type, strike, time_to_expiry, asset_steps)?;
    let n = scheme.asset_steps;
    let m = scheme.time_steps;

    let mut values = DMatrix::zeros(n + 1, m + 1);
    let mut old = scheme.payoff.clone();
    let mut new = vec![0.0; n + 1];
    for (i, &v) in old.iter().enumerate() {
        values[(i, 0)] = v;
    }

    for k in 1..=m {
        scheme.step(&old, &mut new);
        if early_exercise {
            scheme.exercise(&mut new);
        }
        for (i, &v) in new.iter().enumerate() {
            values[(i, k)] = v;
        }
        std::mem::swap(&mut old, &mut new);
    }

    Ok(FdGrid::new(values, scheme.asset_step, scheme.time_step))
}

/// Price an American option keeping only two time slices; returns today's
/// curve with delta, gamma and theta.
///
/// Interior Greeks use central differences; at `S = 0` and `S = 2K` delta is
/// one-sided and gamma is zero.
pub fn price_american_compact(
    volatility: Volatility,
    rate: Rate,
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    early_exercise: bool,
    asset_steps: Size,
) -> Result<FdGreeksTable> {
    let scheme = ExplicitScheme::new(volatility, rate, option_type, strike, time_to_expiry, asset_steps)?;
    let n = scheme.asset_steps;
    let h = scheme.asset_step;

    let mut old = scheme.payoff.clone();
    let mut new = vec![0.0; n + 1];
    for _ in 0..scheme.time_steps {
        scheme.step(&old, &mut new);
        if early_exercise {
            scheme.exercise(&mut new);
        }
        std::mem::swap(&mut old, &mut new);
    }

    let rows = (0..=n)
        .map(|i| {
            let (delta, gamma) = if i == 0 {
                ((old[1] - old[0]) / h, 0.0)
            } else if i == n {
                ((old[n] - old[n - 1]) / h, 0.0)
            } else {
                (central_delta(&old, i, h), central_gamma(&old, i, h))
            };
            let s = scheme.asset_price(i);
            FdGreeksRow {
                asset_price: s,
                payoff: scheme.payoff[i],
                value: old[i],
                delta,
                gamma,
                theta: pde_theta(volatility, rate, s, old[i], delta, gamma),
            }
        })
        .collect();

    Ok(FdGreeksTable {
        rows,
        asset_step: h,
        time_steps: scheme.time_steps,
        time_step: scheme.time_step,
    })
}

// ─── Scheme ───────────────────────────────────────────────────────────────────

/// Validated grid geometry and coefficients shared by all entry points.
struct ExplicitScheme {
    volatility: Volatility,
    rate: Rate,
    asset_steps: Size,
    time_steps: Size,
    asset_step: Real,
    time_step: Time,
    payoff: Vec<Real>,
}

impl ExplicitScheme {
    fn new(
        volatility: Volatility,
        rate: Rate,
        option_type: OptionType,
        strike: Real,
        time_to_expiry: Time,
        asset_steps: Size,
    ) -> Result<Self> {
        ensure!(
            asset_steps >= 2,
            "at least 2 asset steps are required, got {asset_steps}"
        );
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive, got {volatility}"
        );
        ensure!(
            time_to_expiry.is_finite() && time_to_expiry > 0.0,
            "time to expiry must be positive, got {time_to_expiry}"
        );
        ensure!(
            strike.is_finite() && strike > 0.0,
            "strike must be positive, got {strike}"
        );
        ensure!(rate.is_finite(), "interest rate must be finite, got {rate}");

        let n = asset_steps as Real;
        let asset_step = 2.0 * strike / n;
        let max_time_step = STABILITY_FACTOR / (volatility * volatility * n * n);
        let steps = (time_to_expiry / max_time_step).ceil() + 1.0;
        ensure!(
            steps.is_finite() && steps <= MAX_GRID_CELLS as Real,
            "stability bound needs {steps} time steps, more than the grid allows"
        );
        let time_steps = steps as Size;
        let cells = asset_steps
            .checked_add(1)
            .and_then(|rows| rows.checked_mul(time_steps + 1))
            .filter(|&cells| cells <= MAX_GRID_CELLS);
        ensure!(
            cells.is_some(),
            "grid of {asset_steps} asset steps by {time_steps} time steps exceeds {MAX_GRID_CELLS} cells"
        );
        let time_step = time_to_expiry / time_steps as Real;

        let payoff_fn = PlainVanillaPayoff::new(option_type, strike);
        let payoff = (0..=asset_steps)
            .map(|i| payoff_fn.value(i as Real * asset_step))
            .collect();

        debug!(
            asset_steps,
            time_steps,
            asset_step,
            time_step,
            %option_type,
            "explicit FD grid"
        );

        Ok(Self {
            volatility,
            rate,
            asset_steps,
            time_steps,
            asset_step,
            time_step,
            payoff,
        })
    }

    #[inline]
    fn asset_price(&self, i: Size) -> Real {
        i as Real * self.asset_step
    }

    /// Advance one step further from expiry: `new` ← scheme(`old`).
    fn step(&self, old: &[Real], new: &mut [Real]) {
        let n = self.asset_steps;
        let h = self.asset_step;
        let dt = self.time_step;

        for i in 1..n {
            let delta = central_delta(old, i, h);
            let gamma = central_gamma(old, i, h);
            let theta = pde_theta(self.volatility, self.rate, self.asset_price(i), old[i], delta, gamma);
            new[i] = old[i] - dt * theta;
        }

        // S = 0: the asset is worthless forever, only discounting remains
        new[0] = old[0] * (1.0 - self.rate * dt);
        // S = 2K: value linear in S
        new[n] = 2.0 * new[n - 1] - new[n - 2];
    }

    /// Clamp every node to its immediate-exercise value.
    fn exercise(&self, values: &mut [Real]) {
        for (v, &p) in values.iter_mut().zip(&self.payoff) {
            *v = v.max(p);
        }
    }
}

#[inline]
fn central_delta(v: &[Real], i: Size, h: Real) -> Real {
    (v[i + 1] - v[i - 1]) / (2.0 * h)
}

#[inline]
fn central_gamma(v: &[Real], i: Size, h: Real) -> Real {
    (v[i + 1] - 2.0 * v[i] + v[i - 1]) / (h * h)
}

#[inline]
fn pde_theta(sigma: Real, r: Real, s: Real, v: Real, delta: Real, gamma: Real) -> Real {
    -0.5 * sigma * sigma * s * s * gamma - r * s * delta + r * v
}

// ─── Tests ────────────────────────────────────────────────────────────────────
