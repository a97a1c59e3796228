//! Random number generators.
//!
//! Engines consume standard-normal deviates through the
//! [`NormalDeviateSource`] trait: a single "produce next deviate" operation
//! with no arguments. Three generators are provided, all explicitly seeded:
//!
//! * [`InverseCumulativeNormalRng`]: Mersenne Twister (`rand_mt`) through the
//!   inverse normal CDF; the default source of the Monte Carlo engine
//! * [`BoxMullerRng`]: polar Box–Muller over `rand`'s `StdRng`
//! * [`ZigguratNormalRng`]: `rand_distr::StandardNormal` over `StdRng`
//!
//! Any `FnMut() -> Real` closure is also a source, which lets callers inject
//! deterministic sequences.

mod box_muller;

pub use box_muller::{BoxMullerRng, ZigguratNormalRng};

use qr_core::Real;
use rand_mt::Mt19937GenRand64;

/// A source of independent, identically distributed standard normal deviates.
pub trait NormalDeviateSource {
    /// Draw the next deviate.
    fn next_deviate(&mut self) -> Real;
}

impl<F: FnMut() -> Real> NormalDeviateSource for F {
    #[inline]
    fn next_deviate(&mut self) -> Real {
        self()
    }
}

/// Derive the seed of stream `stream` from a base `seed`.
///
/// SplitMix64 finaliser over `seed + (stream + 1)·γ`; neighbouring streams
/// get decorrelated seeds so parallel workers never replay each other's
/// sequence.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut z = seed.wrapping_add(stream.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A uniform pseudo-random number generator based on the Mersenne Twister
/// MT19937-64 algorithm.
pub struct MersenneTwisterUniformRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterUniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Generate the next uniform deviate in `[0, 1)`.
    pub fn next_real(&mut self) -> Real {
        // top 53 bits → exactly representable doubles in [0, 1)
        (self.rng.next_u64() >> 11) as Real * (1.0 / (1u64 << 53) as Real)
    }
}

/// An inverse-cumulative normal random number generator.
///
/// Wraps a Mersenne Twister uniform generator and maps its output through
/// the inverse CDF of the standard normal distribution.
pub struct InverseCumulativeNormalRng {
    inner: MersenneTwisterUniformRng,
}

impl InverseCumulativeNormalRng {
    /// Create a new generator backed by a Mersenne Twister with the given
    /// seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Generate the next standard-normal deviate.
    pub fn next_real(&mut self) -> Real {
        // 0 would map to −∞
        let u = loop {
            let u = self.inner.next_real();
            if u > 0.0 {
                break u;
            }
        };
        crate::distributions::normal_cdf_inverse(u)
    }
}

impl NormalDeviateSource for InverseCumulativeNormalRng {
    #[inline]
    fn next_deviate(&mut self) -> Real {
        self.next_real()
    }
}
