//! Streaming statistics accumulator for simulation outcomes.

use qr_core::Real;

/// Running moments of a stream of samples.
///
/// Reports count, mean, variance, standard error and range. Two accumulators combine with [`Statistics::merge`]; since
/// only sums are kept, merging is associative and commutative up to
/// floating-point rounding, so partial accumulators built on separate
/// workers can be reduced in any fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    n: usize,
    sum: Real,
    sum_sq: Real,
    lo: Real,
    hi: Real,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// An accumulator holding no samples.
    pub fn new() -> Self {
        Self {
            n: 0,
            sum: 0.0,
            sum_sq: 0.0,
            lo: Real::INFINITY,
            hi: Real::NEG_INFINITY,
        }
    }

    /// Record one sample.
    #[inline]
    pub fn add(&mut self, x: Real) {
        self.n += 1;
        self.sum += x;
        self.sum_sq += x * x;
        self.lo = self.lo.min(x);
        self.hi = self.hi.max(x);
    }

    /// Fold the samples of `other` into `self`.
    pub fn merge(&mut self, other: &Statistics) {
        self.n += other.n;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.lo = self.lo.min(other.lo);
        self.hi = self.hi.max(other.hi);
    }

    /// How many samples have been recorded.
    pub fn samples(&self) -> usize {
        self.n
    }

    /// Sum of all samples.
    pub fn sum(&self) -> Real {
        self.sum
    }

    /// Arithmetic mean, `None` when empty.
    pub fn mean(&self) -> Option<Real> {
        (self.n > 0).then(|| self.sum / self.n as Real)
    }

    /// Bessel-corrected sample variance, `None` below two samples.
    ///
    /// Computed from the raw sums and clamped at zero against cancellation.
    pub fn variance(&self) -> Option<Real> {
        if self.n < 2 {
            return None;
        }
        let n = self.n as Real;
        let m = self.sum / n;
        Some(((self.sum_sq - n * m * m) / (n - 1.0)).max(0.0))
    }

    /// Square root of [`Statistics::variance`].
    pub fn std_dev(&self) -> Option<Real> {
        self.variance().map(Real::sqrt)
    }

    /// Standard error of the mean, `s / √n`.
    pub fn error_estimate(&self) -> Option<Real> {
        self.variance().map(|v| (v / self.n as Real).sqrt())
    }

    /// Smallest sample, `None` when empty.
    pub fn minimum(&self) -> Option<Real> {
        (self.n > 0).then_some(self.lo)
    }

    /// Largest sample, `None` when empty.
    pub fn maximum(&self) -> Option<Real> {
        (self.n > 0).then_some(self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn moments_of_one_to_five() {
        let mut s = Statistics::default();
        (1..=5).for_each(|i| s.add(i as Real));
        assert_eq!(s.samples(), 5);
        assert_abs_diff_eq!(s.mean().unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.variance().unwrap(), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.std_dev().unwrap(), 2.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(s.error_estimate().unwrap(), (2.5_f64 / 5.0).sqrt(), epsilon = 1e-12);
        assert_eq!(s.minimum(), Some(1.0));
        assert_eq!(s.maximum(), Some(5.0));
    }

    #[test]
    fn empty_accumulator_reports_nothing() {
        let s = Statistics::default();
        assert_eq!(s.samples(), 0);
        assert_eq!(s.mean(), None);
        assert_eq!(s.error_estimate(), None);
        assert!(s.minimum().is_none());
    }

    #[test]
    fn merging_empty_is_identity() {
        let mut s = Statistics::new();
        s.add(3.0);
        let before = s.clone();
        s.merge(&Statistics::new());
        assert_eq!(s, before);
    }

    proptest! {
        #[test]
        fn merge_matches_single_pass(xs in prop::collection::vec(0.0..100.0_f64, 2..200), split in 0usize..200) {
            let split = split.min(xs.len());
            let mut whole = Statistics::new();
            xs.iter().for_each(|&x| whole.add(x));

            let mut left = Statistics::new();
            let mut right = Statistics::new();
            xs[..split].iter().for_each(|&x| left.add(x));
            xs[split..].iter().for_each(|&x| right.add(x));
            left.merge(&right);

            prop_assert_eq!(left.samples(), whole.samples());
            prop_assert!((left.mean().unwrap() - whole.mean().unwrap()).abs() < 1e-9);
            prop_assert!((left.variance().unwrap() - whole.variance().unwrap()).abs() < 1e-6);
            prop_assert_eq!(left.minimum(), whole.minimum());
            prop_assert_eq!(left.maximum(), whole.maximum());
        }
    }
}
