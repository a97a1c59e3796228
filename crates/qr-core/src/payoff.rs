//! Option type and the plain-vanilla payoff.
//!
//! The payoff is the only place where the call/put distinction enters the
//! engines: `max(φ·(S − K), 0)` with `φ = +1` for a call and `−1` for a put.

use crate::Real;
use std::fmt;
use std::str::FromStr;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(crate::Error::InvalidParameter(format!(
                "unknown option type '{other}' (expected call or put)"
            ))),
        }
    }
}

/// Standard "plain vanilla" European/American option payoff.
///
/// `payoff = max(φ(S − K), 0)` where `φ = +1` for Call, `−1` for Put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainVanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// Payoff for the underlying at `price`.
    #[inline]
    pub fn value(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sign_convention() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
    }

    #[test]
    fn vanilla_payoffs() {
        let call = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        let put = PlainVanillaPayoff::new(OptionType::Put, 100.0);
        assert_eq!(call.value(120.0), 20.0);
        assert_eq!(call.value(80.0), 0.0);
        assert_eq!(put.value(80.0), 20.0);
        assert_eq!(put.value(120.0), 0.0);
        assert_eq!(call.to_string(), "Vanilla Call @ 100");
    }

    #[test]
    fn parse_option_type() {
        assert_eq!("call".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!("PUT".parse::<OptionType>(), Ok(OptionType::Put));
        assert!("straddle".parse::<OptionType>().is_err());
    }

    proptest! {
        #[test]
        fn call_minus_put_is_forward_intrinsic(s in 0.0..500.0_f64, k in 1.0..300.0_f64) {
            let call = PlainVanillaPayoff::new(OptionType::Call, k).value(s);
            let put = PlainVanillaPayoff::new(OptionType::Put, k).value(s);
            prop_assert!(call >= 0.0 && put >= 0.0);
            prop_assert!((call - put - (s - k)).abs() < 1e-9);
        }
    }
}
