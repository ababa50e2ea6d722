//! The xoroshiro128+ step, written once over [`LaneVector`]
//!
//! Per lane:
//!
//! ```text
//! result = rotl(s0 + s1, 17) + s0
//! s1    ^= s0
//! s0     = rotl(s0, 49) ^ s1 ^ (s1 << 21)
//! s1     = rotl(s1, 28)
//! ```

use crate::primitives::{LaneState, LaneVector};

pub const RESULT_ROTATION: u32 = 17;
pub const S0_ROTATION: u32 = 49;
pub const S1_SHIFT: u32 = 21;
pub const S1_ROTATION: u32 = 28;

/// Advance every lane by one step and return the step's outputs
///
/// # Safety
/// `V::is_available()` must hold.
#[inline(always)]
pub unsafe fn step<V: LaneVector>(state: &mut LaneState<V>) -> V {
    let s0 = state.s0;
    let s1 = state.s1;

    let result = s0.add(s1).rotl(RESULT_ROTATION).add(s0);

    let s1 = s1.xor(s0);
    state.s0 = s0.rotl(S0_ROTATION).xor(s1).xor(s1.shl(S1_SHIFT));
    state.s1 = s1.rotl(S1_ROTATION);

    result
}

/// Fill `out` with consecutive steps, lane 0 first within each step
///
/// # Safety
/// `V::is_available()` must hold.
#[inline(always)]
pub unsafe fn fill<V: LaneVector>(state: &mut LaneState<V>, out: &mut [u64]) {
    debug_assert_eq!(out.len() % V::LANES, 0, "fill length must be a multiple of the lane count");

    for chunk in out.chunks_exact_mut(V::LANES) {
        step(state).store(chunk);
    }
}

/// Single-lane step on plain integers
///
/// Reference form of [`step`], used by tests and the scalar seeding path.
#[inline]
pub fn step_u64(s0: &mut u64, s1: &mut u64) -> u64 {
    let result = s0.wrapping_add(*s1).rotate_left(RESULT_ROTATION).wrapping_add(*s0);
    let t = *s1 ^ *s0;
    *s0 = s0.rotate_left(S0_ROTATION) ^ t ^ (t << S1_SHIFT);
    *s1 = t.rotate_left(S1_ROTATION);
    result
}
