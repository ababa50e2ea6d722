//! Portable backend: W lanes in a plain array
//!
//! Produces exactly the same per-lane sequence as the hardware backend of
//! the same width, so it doubles as their reference in tests. LLVM
//! usually auto-vectorizes the lane loops.

use crate::error::Error;
use crate::primitives::LaneVector;

/// W 64-bit lanes in ordinary memory
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortableLanes<const W: usize>(pub [u64; W]);

impl<const W: usize> PortableLanes<W> {
    #[inline(always)]
    fn zip_with(self, other: Self, f: impl Fn(u64, u64) -> u64) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }

    #[inline(always)]
    fn map(self, f: impl Fn(u64) -> u64) -> Self {
        Self(self.0.map(f))
    }
}

impl<const W: usize> LaneVector for PortableLanes<W> {
    const LANES: usize = W;
    const NAME: &'static str = "portable";

    type Array = [u64; W];

    fn is_available() -> bool {
        W > 0
    }

    fn unavailable() -> Error {
        Error::InvalidConfig("portable backend needs at least one lane".to_string())
    }

    fn zero_array() -> [u64; W] {
        [0; W]
    }

    #[inline(always)]
    unsafe fn load(lanes: &[u64; W]) -> Self {
        Self(*lanes)
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        out[..W].copy_from_slice(&self.0);
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        self.zip_with(other, u64::wrapping_add)
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a ^ b)
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    #[inline(always)]
    unsafe fn shl(self, n: u32) -> Self {
        self.map(|x| x << n)
    }

    #[inline(always)]
    unsafe fn shr(self, n: u32) -> Self {
        self.map(|x| x >> n)
    }

    #[inline(always)]
    unsafe fn rotl(self, n: u32) -> Self {
        self.map(|x| x.rotate_left(n))
    }
}
