//! Normal deviates over `rand`'s `StdRng`.

use super::NormalDeviateSource;
use qr_core::Real;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Polar (Marsaglia) Box–Muller generator.
///
/// Draws `(x, y)` uniformly in the unit square `[-1, 1)²` until the point
/// falls strictly inside the unit circle, then returns
/// `x·√(−2 ln s / s)` with `s = x² + y²`. The second deviate of each pair is
/// cached and returned by the following call.
pub struct BoxMullerRng {
    rng: StdRng,
    spare: Option<Real>,
}

impl BoxMullerRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spare: None,
        }
    }

    /// Generate the next standard-normal deviate.
    pub fn next_real(&mut self) -> Real {
        if let Some(spare) = self.spare.take() {
            return spare;
        }
        loop {
            let x = 2.0 * self.rng.gen::<Real>() - 1.0;
            let y = 2.0 * self.rng.gen::<Real>() - 1.0;
            let s = x * x + y * y;
            if s > 0.0 && s < 1.0 {
                let factor = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(y * factor);
                return x * factor;
            }
        }
    }
}

impl NormalDeviateSource for BoxMullerRng {
    #[inline]
    fn next_deviate(&mut self) -> Real {
        self.next_real()
    }
}

/// Ziggurat generator: `rand_distr::StandardNormal` sampled from a seeded
/// `StdRng`.
pub struct ZigguratNormalRng {
    rng: StdRng,
}

impl ZigguratNormalRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NormalDeviateSource for ZigguratNormalRng {
    #[inline]
    fn next_deviate(&mut self) -> Real {
        self.rng.sample(StandardNormal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_moments(source: &mut dyn NormalDeviateSource, n: usize) -> (Real, Real) {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let z = source.next_deviate();
            sum += z;
            sum_sq += z * z;
        }
        let mean = sum / n as Real;
        (mean, sum_sq / n as Real - mean * mean)
    }

    #[test]
    fn box_muller_is_standard_normal() {
        let mut rng = BoxMullerRng::new(2024);
        let (mean, var) = sample_moments(&mut rng, 50_000);
        assert!(mean.abs() < 0.03, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.03, "var = {var}");
    }

    #[test]
    fn box_muller_fraction_within_one_sigma() {
        let mut rng = BoxMullerRng::new(99);
        let n = 40_000;
        let inside = (0..n).filter(|_| rng.next_real().abs() < 1.0).count();
        let frac = inside as Real / n as Real;
        assert!((frac - 0.6827).abs() < 0.01, "P(|Z| < 1) ≈ {frac}");
    }

    #[test]
    fn ziggurat_is_standard_normal() {
        let mut rng = ZigguratNormalRng::new(2024);
        let (mean, var) = sample_moments(&mut rng, 50_000);
        assert!(mean.abs() < 0.03, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.03, "var = {var}");
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let mut a = BoxMullerRng::new(5);
        let mut b = BoxMullerRng::new(5);
        let mut c = ZigguratNormalRng::new(5);
        let mut d = ZigguratNormalRng::new(5);
        for _ in 0..50 {
            assert_eq!(a.next_deviate().to_bits(), b.next_deviate().to_bits());
            assert_eq!(c.next_deviate().to_bits(), d.next_deviate().to_bits());
        }
    }
}
