//! SSE2 backend: two lanes in an `xmm` register
//!
//! SSE2 has no 64-bit rotate, so `rotl` keeps the trait's shift/or form.

use crate::detect::{self, Tier};
use crate::error::Error;
use crate::generator::recurrence;
use crate::primitives::{LaneState, LaneVector};
use std::arch::x86_64::*;

/// Two 64-bit lanes in one `__m128i`
#[derive(Clone, Copy, Debug)]
pub struct Sse2Lanes(__m128i);

impl LaneVector for Sse2Lanes {
    const LANES: usize = 2;
    const NAME: &'static str = "sse2";

    type Array = [u64; 2];

    fn is_available() -> bool {
        detect::detect(Tier::Sse2)
    }

    fn unavailable() -> Error {
        Error::unsupported_cpu(Tier::Sse2)
    }

    fn zero_array() -> [u64; 2] {
        [0; 2]
    }

    #[inline(always)]
    unsafe fn load(lanes: &[u64; 2]) -> Self {
        Self(_mm_loadu_si128(lanes.as_ptr() as *const __m128i))
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        let out = &mut out[..Self::LANES];
        _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0);
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        Self(_mm_add_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(_mm_xor_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Self(_mm_or_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn shl(self, n: u32) -> Self {
        Self(_mm_sll_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline(always)]
    unsafe fn shr(self, n: u32) -> Self {
        Self(_mm_srl_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline]
    unsafe fn fill(state: &mut LaneState<Self>, out: &mut [u64]) {
        fill_sse2(state, out)
    }
}

#[target_feature(enable = "sse2")]
unsafe fn fill_sse2(state: &mut LaneState<Sse2Lanes>, out: &mut [u64]) {
    recurrence::fill(state, out)
}
