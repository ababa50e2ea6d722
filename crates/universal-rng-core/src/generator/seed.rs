//! SplitMix64 seed expansion
//!
//! Lane `i` of a width-W generator is seeded from `seed + i`; its two state
//! words are `s0 = splitmix64(seed + i)` and `s1 = splitmix64(s0)`.
//! `splitmix64` is a bijection with `splitmix64(0) != 0`, so no lane can
//! start in the all-zero state.

use crate::primitives::LaneVector;

/// SplitMix64 increment (2^64 / golden ratio)
pub const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// One SplitMix64 output for state `x`
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Initial `(s0, s1)` for a single lane
#[inline]
pub fn lane_state(lane_seed: u64) -> (u64, u64) {
    let s0 = splitmix64(lane_seed);
    (s0, splitmix64(s0))
}

/// Initial state words for all lanes of `V`
pub(crate) fn expand_lanes<V: LaneVector>(seed: u64) -> (V::Array, V::Array) {
    let mut s0 = V::zero_array();
    let mut s1 = V::zero_array();
    for (lane, (a, b)) in s0.as_mut().iter_mut().zip(s1.as_mut().iter_mut()).enumerate() {
        (*a, *b) = lane_state(seed.wrapping_add(lane as u64));
    }
    (s0, s1)
}
