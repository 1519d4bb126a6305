//! ## qnet-core::rng
//! **Deterministic 48-bit linear congruential generator**
//!
//! Every arrival time, service time and routing decision is drawn from this
//! generator. The constants are fixed so that a seed yields the same sequence
//! on every platform and in every build:
//!
//! | constant     | value           |
//! |--------------|-----------------|
//! | multiplier   | `0x5DEECE66D`   |
//! | increment    | `0xB`           |
//! | modulus      | `2^48`          |
//!
//! Seeding scrambles the seed with `seed ^ multiplier` (mod `2^48`). Each call
//! to [`Lcg48::next_f64`] advances the state once and returns `state / 2^48`.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};

pub const MULTIPLIER: u64 = 0x5_DEEC_E66D;
pub const INCREMENT: u64 = 0xB;
pub const MODULUS_BITS: u32 = 48;

const MASK: u64 = (1 << MODULUS_BITS) - 1;
const SCALE: f64 = (1u64 << MODULUS_BITS) as f64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg48 {
    state: u64,
}

impl Lcg48 {
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ MULTIPLIER) & MASK,
        }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        self.state
    }

    /// Uniform value in `[0, 1)`. One call is one unit of the random budget.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / SCALE
    }

    /// Uniform value in `[min, max)`, consuming one draw.
    #[inline]
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

impl RngCore for Lcg48 {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> (MODULUS_BITS - 32)) as u32
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Lcg48 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_sequence_for_seed() {
        let mut rng = Lcg48::new(1234);
        assert_eq!(rng.next_f64(), 181_996_700_050_782.0 / SCALE);
        assert_eq!(rng.next_f64(), 73_124_365_360_401.0 / SCALE);
        assert_eq!(rng.next_f64(), 267_783_390_291_528.0 / SCALE);
    }

    #[test]
    fn test_seed_zero_is_valid() {
        let mut rng = Lcg48::new(0);
        assert_eq!(rng.next_f64(), 205_749_139_540_596.0 / SCALE);
    }

    #[test]
    fn test_negative_seed_uses_twos_complement_bits() {
        let mut rng = Lcg48::new(-5i64 as u64);
        assert_eq!(rng.next_f64(), 75_801_481_881_833.0 / SCALE);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Lcg48::new(987_654_321);
        let mut b = Lcg48::seed_from_u64(987_654_321);
        for _ in 0..1_000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_from_seed_matches_new() {
        let mut a = Lcg48::from_seed(42u64.to_le_bytes());
        let mut b = Lcg48::new(42);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Lcg48::new(1);
        let mut b = Lcg48::new(2);
        assert_ne!(a.next_f64(), b.next_f64());
    }

    #[test]
    fn test_uniform_bounds() {
        let mut rng = Lcg48::new(7);
        for _ in 0..10_000 {
            let v = rng.uniform(2.0, 4.0);
            assert!((2.0..4.0).contains(&v));
        }
    }

    proptest! {
        #[test]
        fn next_f64_stays_in_unit_interval(seed in any::<u64>()) {
            let mut rng = Lcg48::new(seed);
            for _ in 0..256 {
                let v = rng.next_f64();
                prop_assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
