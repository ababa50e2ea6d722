//! AVX2 backend: four lanes in a `ymm` register
//!
//! Shift counts go through an `xmm` operand (`vpsllq ymm, ymm, xmm`) so the
//! rotation amounts can stay ordinary arguments; with `#[inline(always)]`
//! they fold to immediates inside `fill_avx2`.

use crate::detect::{self, Tier};
use crate::error::Error;
use crate::generator::recurrence;
use crate::primitives::{LaneState, LaneVector};
use std::arch::x86_64::*;

/// Four 64-bit lanes in one `__m256i`
#[derive(Clone, Copy, Debug)]
pub struct Avx2Lanes(__m256i);

impl LaneVector for Avx2Lanes {
    const LANES: usize = 4;
    const NAME: &'static str = "avx2";

    type Array = [u64; 4];

    fn is_available() -> bool {
        detect::detect(Tier::Avx2)
    }

    fn unavailable() -> Error {
        Error::unsupported_cpu(Tier::Avx2)
    }

    fn zero_array() -> [u64; 4] {
        [0; 4]
    }

    #[inline(always)]
    unsafe fn load(lanes: &[u64; 4]) -> Self {
        Self(_mm256_loadu_si256(lanes.as_ptr() as *const __m256i))
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        let out = &mut out[..Self::LANES];
        _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, self.0);
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        Self(_mm256_add_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(_mm256_xor_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Self(_mm256_or_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn shl(self, n: u32) -> Self {
        Self(_mm256_sll_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline(always)]
    unsafe fn shr(self, n: u32) -> Self {
        Self(_mm256_srl_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline]
    unsafe fn fill(state: &mut LaneState<Self>, out: &mut [u64]) {
        fill_avx2(state, out)
    }
}

#[target_feature(enable = "avx2")]
unsafe fn fill_avx2(state: &mut LaneState<Avx2Lanes>, out: &mut [u64]) {
    recurrence::fill(state, out)
}
