//! AVX-512 backend: eight lanes in a `zmm` register
//!
//! AVX-512F has a native variable 64-bit rotate (`vprolvq`), used in place
//! of the shift/or composition.

use crate::detect::{self, Tier};
use crate::error::Error;
use crate::generator::recurrence;
use crate::primitives::{LaneState, LaneVector};
use std::arch::x86_64::*;

/// Eight 64-bit lanes in one `__m512i`
#[derive(Clone, Copy, Debug)]
pub struct Avx512Lanes(__m512i);

impl LaneVector for Avx512Lanes {
    const LANES: usize = 8;
    const NAME: &'static str = "avx512";

    type Array = [u64; 8];

    fn is_available() -> bool {
        detect::detect(Tier::Avx512)
    }

    fn unavailable() -> Error {
        Error::unsupported_cpu(Tier::Avx512)
    }

    fn zero_array() -> [u64; 8] {
        [0; 8]
    }

    #[inline(always)]
    unsafe fn load(lanes: &[u64; 8]) -> Self {
        Self(_mm512_loadu_epi64(lanes.as_ptr() as *const i64))
    }

    #[inline(always)]
    unsafe fn store(self, out: &mut [u64]) {
        let out = &mut out[..Self::LANES];
        _mm512_storeu_epi64(out.as_mut_ptr() as *mut i64, self.0);
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        Self(_mm512_add_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(_mm512_xor_si512(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        Self(_mm512_or_si512(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn shl(self, n: u32) -> Self {
        Self(_mm512_sll_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline(always)]
    unsafe fn shr(self, n: u32) -> Self {
        Self(_mm512_srl_epi64(self.0, _mm_cvtsi32_si128(n as i32)))
    }

    #[inline(always)]
    unsafe fn rotl(self, n: u32) -> Self {
        Self(_mm512_rolv_epi64(self.0, _mm512_set1_epi64(n as i64)))
    }

    #[inline]
    unsafe fn fill(state: &mut LaneState<Self>, out: &mut [u64]) {
        fill_avx512(state, out)
    }
}

#[target_feature(enable = "avx512f")]
unsafe fn fill_avx512(state: &mut LaneState<Avx512Lanes>, out: &mut [u64]) {
    recurrence::fill(state, out)
}
