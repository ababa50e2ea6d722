//! Lane-parallel 64-bit integer operations
//!
//! The generator recurrence is written once against [`LaneVector`]; each
//! backend instantiates it at its own width.

use crate::error::Error;
use crate::generator::recurrence;
use std::fmt::Debug;

/// Two state words of a xoroshiro128 lane group
#[derive(Clone, Copy, Debug)]
pub struct LaneState<V> {
    pub s0: V,
    pub s1: V,
}

/// W independent 64-bit lanes with wrapping per-lane arithmetic
///
/// Every operation acts on each lane separately; no operation moves bits
/// between lanes.
///
/// # Safety
///
/// The `unsafe fn` operations may execute instructions from the backend's
/// instruction set. Callers must ensure [`LaneVector::is_available`]
/// returned `true` before calling any of them. `LaneGenerator` upholds this
/// by checking once at construction.
pub trait LaneVector: Copy + Debug + Send + Sync + 'static {
    /// Number of 64-bit lanes
    const LANES: usize;

    /// Backend name used in diagnostics
    const NAME: &'static str;

    /// Plain storage for one value per lane
    type Array: Copy + Debug + Send + Sync + AsRef<[u64]> + AsMut<[u64]>;

    /// Whether this build and this host can execute the backend
    fn is_available() -> bool;

    /// Error describing why [`is_available`](Self::is_available) is false
    fn unavailable() -> Error;

    fn zero_array() -> Self::Array;

    unsafe fn load(lanes: &Self::Array) -> Self;

    /// Write all lanes to the front of `out`
    ///
    /// Panics if `out` holds fewer than `LANES` values.
    unsafe fn store(self, out: &mut [u64]);

    unsafe fn add(self, other: Self) -> Self;

    unsafe fn xor(self, other: Self) -> Self;

    unsafe fn or(self, other: Self) -> Self;

    /// Logical shift left; `n` in `1..64`
    unsafe fn shl(self, n: u32) -> Self;

    /// Logical shift right; `n` in `1..64`
    unsafe fn shr(self, n: u32) -> Self;

    /// Rotate left; `n` in `1..64`
    #[inline(always)]
    unsafe fn rotl(self, n: u32) -> Self {
        self.shl(n).or(self.shr(64 - n))
    }

    /// Run the recurrence `out.len() / LANES` times, storing each step's
    /// outputs consecutively
    ///
    /// `out.len()` must be a multiple of `LANES`. Hardware backends
    /// override this to compile the loop with their target features.
    #[inline]
    unsafe fn fill(state: &mut LaneState<Self>, out: &mut [u64]) {
        recurrence::fill(state, out)
    }
}
