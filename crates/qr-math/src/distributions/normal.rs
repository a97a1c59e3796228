//! Standard normal distribution.

use qr_core::Real;
use std::f64::consts::PI;

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
///
/// Abramowitz & Stegun 26.2.17, maximum absolute error < 7.5×10⁻⁸.
pub fn normal_cdf(x: Real) -> Real {
    const GAMMA: Real = 0.231_641_9;
    const A: [Real; 5] = [
        0.319_381_530,
        -0.356_563_782,
        1.781_477_937,
        -1.821_255_978,
        1.330_274_429,
    ];

    if x == 0.0 {
        return 0.5;
    }
    let k = 1.0 / (1.0 + GAMMA * x.abs());
    let poly = k * (A[0] + k * (A[1] + k * (A[2] + k * (A[3] + k * A[4]))));
    let tail = normal_pdf(x) * poly;
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// The inverse standard normal CDF (probit function).
///
/// Peter J. Acklam's rational approximation, maximum absolute error
/// < 1.15×10⁻⁹. Returns `−∞` at `p = 0`, `+∞` at `p = 1` and NaN outside
/// `[0, 1]`.
pub fn normal_cdf_inverse(p: Real) -> Real {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Real::NAN;
    }
    if p == 0.0 {
        return Real::NEG_INFINITY;
    }
    if p == 1.0 {
        return Real::INFINITY;
    }
    acklam_inverse(p)
}

// Acklam's coefficients, highest degree first.
const CENTRAL_NUM: [Real; 6] = [
    -39.696_830_286_653_76,
    220.946_098_424_520_5,
    -275.928_510_446_968_7,
    138.357_751_867_269,
    -30.664_798_066_147_16,
    2.506_628_277_459_239,
];
const CENTRAL_DEN: [Real; 6] = [
    -54.476_098_798_224_06,
    161.585_836_858_040_9,
    -155.698_979_859_886_6,
    66.801_311_887_719_72,
    -13.280_681_552_885_72,
    1.0,
];
const TAIL_NUM: [Real; 6] = [
    -0.007_784_894_002_430_293,
    -0.322_396_458_041_136_5,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const TAIL_DEN: [Real; 5] = [
    0.007_784_695_709_041_462,
    0.322_467_129_070_039_8,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
    1.0,
];
/// Below this probability (and above its complement) the tail form applies.
const TAIL_SPLIT: Real = 0.024_25;

#[inline]
fn horner(coefficients: &[Real], x: Real) -> Real {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

fn acklam_inverse(p: Real) -> Real {
    // lower tail; the upper tail follows from Φ⁻¹(1 − p) = −Φ⁻¹(p)
    let lower_tail = |p: Real| {
        let q = (-2.0 * p.ln()).sqrt();
        horner(&TAIL_NUM, q) / horner(&TAIL_DEN, q)
    };

    if p < TAIL_SPLIT {
        lower_tail(p)
    } else if p > 1.0 - TAIL_SPLIT {
        -lower_tail(1.0 - p)
    } else {
        let q = p - 0.5;
        q * horner(&CENTRAL_NUM, q * q) / horner(&CENTRAL_DEN, q * q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use statrs::distribution::{Continuous, ContinuousCDF, Normal};

    #[test]
    fn normal_pdf_at_zero() {
        assert_abs_diff_eq!(normal_pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn normal_cdf_symmetry_and_tails() {
        assert_eq!(normal_cdf(0.0), 0.5);
        for x in [0.1, 0.5, 1.0, 1.96, 3.0] {
            assert_abs_diff_eq!(normal_cdf(x) + normal_cdf(-x), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(normal_cdf(10.0), 1.0, epsilon = 1e-10);
        assert!(normal_cdf(-10.0) < 1e-10);
    }

    #[test]
    fn agrees_with_statrs() {
        let reference = Normal::new(0.0, 1.0).unwrap();
        for i in -40..=40 {
            let x = i as Real * 0.1;
            assert_abs_diff_eq!(normal_cdf(x), reference.cdf(x), epsilon = 1e-7);
            assert_abs_diff_eq!(normal_pdf(x), reference.pdf(x), epsilon = 1e-14);
        }
        for p in [1e-6, 0.001, 0.02, 0.3, 0.5, 0.7, 0.98, 0.999] {
            assert_abs_diff_eq!(normal_cdf_inverse(p), reference.inverse_cdf(p), epsilon = 1e-8);
        }
    }

    #[test]
    fn inverse_cdf_edges() {
        assert_eq!(normal_cdf_inverse(0.0), Real::NEG_INFINITY);
        assert_eq!(normal_cdf_inverse(1.0), Real::INFINITY);
        assert!(normal_cdf_inverse(1.5).is_nan());
        assert!(normal_cdf_inverse(-0.1).is_nan());
        assert!(normal_cdf_inverse(Real::NAN).is_nan());
        assert!(normal_cdf_inverse(1e-300).is_finite());
        assert!(normal_cdf_inverse(1.0 - 1e-16).is_finite());
    }
}
