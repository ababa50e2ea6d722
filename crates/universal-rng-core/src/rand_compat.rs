//! `rand` integration
//!
//! Lets the generators drive `rand`'s distributions and helpers. None of
//! these implement `CryptoRng`.

use crate::dispatch::UniversalRng;
use crate::generator::{LaneGenerator, PortableGenerator, ScalarGenerator};
use crate::primitives::LaneVector;
use rand::{RngCore, SeedableRng};

impl RngCore for UniversalRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        UniversalRng::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        UniversalRng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        UniversalRng::fill_bytes(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        UniversalRng::fill_bytes(self, dest);
        Ok(())
    }
}

impl<V: LaneVector> RngCore for LaneGenerator<V> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        LaneGenerator::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        LaneGenerator::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        LaneGenerator::fill_bytes(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        LaneGenerator::fill_bytes(self, dest);
        Ok(())
    }
}

impl SeedableRng for ScalarGenerator {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

impl<const W: usize> SeedableRng for PortableGenerator<W> {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seed_from_u64(u64::from_le_bytes(seed))
    }

    /// # Panics
    /// Panics for `W == 0`.
    fn seed_from_u64(state: u64) -> Self {
        assert!(W > 0, "portable generator needs at least one lane");
        // Safety: the portable backend runs everywhere once W > 0
        unsafe { Self::new_unchecked(state) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seed_from_u64_matches_new() {
        let mut a = ScalarGenerator::seed_from_u64(42);
        let mut b = ScalarGenerator::new(42);
        assert_eq!(RngCore::next_u64(&mut a), b.next_u64());

        let mut c = ScalarGenerator::from_seed(42u64.to_le_bytes());
        assert_eq!(RngCore::next_u64(&mut c), 0x1798_5c1d_f11d_9a07);
    }

    #[test]
    fn test_rng_helpers_work() {
        let mut rng = UniversalRng::new(3).unwrap();
        for _ in 0..1000 {
            let x: u32 = rng.gen_range(10..20);
            assert!((10..20).contains(&x));
            let f: f64 = rng.gen();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_portable_seedable() {
        let mut a = PortableGenerator::<4>::seed_from_u64(1);
        let mut b = PortableGenerator::<4>::try_new(1).unwrap();
        for _ in 0..9 {
            assert_eq!(RngCore::next_u64(&mut a), b.next_u64());
        }
    }
}
