//! Scalar backend: one lane in a general-purpose register

use crate::error::Error;
use crate::primitives::LaneVector;

/// Single 64-bit lane, always available
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarLane(pub u64);

impl LaneVector for ScalarLane {
    const LANES: usize = 1;
    const NAME: &'static str = "scalar";

    type Array = [u64; 1];

    fn is_available() -> bool {
        true
    }

    fn unavailable() -> Error {
        Error::Initialization("scalar backend reported unavailable".to_string())
    }

    fn zero_array() -> [u64; 1] {
        [0]
    }

    #[inline(always)]
    unsafe fn load(lanes: &[u64; 1]) -> Self {
        Self(lanes[0])
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        out[0] = self.0;
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    unsafe fn shl(self, n: u32) -> Self {
        Self(self.0 << n)
    }

    #[inline(always)]
    unsafe fn shr(self, n: u32) -> Self {
        Self(self.0 >> n)
    }

    #[inline(always)]
    unsafe fn rotl(self, n: u32) -> Self {
        Self(self.0.rotate_left(n))
    }
}
