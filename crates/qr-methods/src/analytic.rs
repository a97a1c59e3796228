//! Closed-form Black-Scholes-Merton price of a European option.
//!
//! $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
//! $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
//!
//! where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$.
//!
//! The numerical engines are validated against this price.

use qr_core::{OptionType, Price, Rate, Real, Time, Volatility};
use qr_math::normal_cdf;

/// Black-Scholes-Merton price of a European option.
///
/// At or past expiry (`time_to_expiry <= 0`) the intrinsic value is
/// returned; with zero total volatility the discounted forward intrinsic
/// value is returned.
pub fn black_scholes_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    time_to_expiry: Time,
) -> Price {
    let phi = option_type.sign();
    let t = time_to_expiry;

    if t <= 0.0 {
        return (phi * (spot - strike)).max(0.0);
    }

    let std_dev = volatility * t.sqrt();
    let df_r = (-rate * t).exp();
    let df_q = (-dividend_yield * t).exp();

    if std_dev <= 1e-15 {
        return (phi * (spot * df_q - strike * df_r)).max(0.0);
    }

    let d1 = ((spot / strike).ln() + (rate - dividend_yield + 0.5 * volatility * volatility) * t)
        / std_dev;
    let d2 = d1 - std_dev;

    phi * (spot * df_q * normal_cdf(phi * d1) - strike * df_r * normal_cdf(phi * d2))
}
