//! Lane-parallel xoroshiro128+ generators
//!
//! [`LaneGenerator<V>`] owns W lanes of 128-bit state, a W-value results
//! buffer and a cursor. Each refill runs one recurrence step on every lane
//! and overwrites the whole buffer; the cursor counts buffered values
//! already handed out.
//!
//! ```text
//! cursor:   0        1        ...   W-1        W (exhausted)
//! buffer: [lane 0] [lane 1]  ...  [lane W-1]
//! ```
//!
//! Construction runs one step up front, so the buffer is warm and the
//! cursor starts at 0. The output of a width-W generator interleaves its
//! lanes: value `k` is step `k / W` of the lane seeded with `seed + k % W`.

pub mod recurrence;
pub mod seed;

use crate::error::{Error, Result};
use crate::primitives::{LaneState, LaneVector, PortableLanes, ScalarLane};

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
use crate::primitives::Sse2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
use crate::primitives::Avx2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
use crate::primitives::Avx512Lanes;

/// Scale for 53-bit doubles: 2^-53
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;
/// Scale for 24-bit floats: 2^-24
const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;

/// Top 53 bits scaled to `[0, 1)`
#[inline(always)]
pub fn u64_to_double(x: u64) -> f64 {
    (x >> 11) as f64 * DOUBLE_UNIT
}

/// Top 24 bits scaled to `[0, 1)`
#[inline(always)]
pub fn u64_to_float(x: u64) -> f32 {
    (x >> 40) as f32 * FLOAT_UNIT
}

/// xoroshiro128+ replicated across the lanes of `V`
///
/// Invariant: the backend of `V` was verified available when this value
/// was created, which is what makes the internal `unsafe` calls sound.
#[derive(Clone, Debug)]
pub struct LaneGenerator<V: LaneVector> {
    state: LaneState<V>,
    buffer: V::Array,
    cursor: usize,
}

/// Single-lane generator, available everywhere
pub type ScalarGenerator = LaneGenerator<ScalarLane>;

/// W-lane generator on plain arrays
pub type PortableGenerator<const W: usize> = LaneGenerator<PortableLanes<W>>;

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub type Sse2Generator = LaneGenerator<Sse2Lanes>;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub type Avx2Generator = LaneGenerator<Avx2Lanes>;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub type Avx512Generator = LaneGenerator<Avx512Lanes>;

impl<V: LaneVector> LaneGenerator<V> {
    /// Seed all lanes from `seed`, failing if the backend cannot run here
    pub fn try_new(seed: u64) -> Result<Self> {
        if !V::is_available() {
            return Err(V::unavailable());
        }
        // Safety: availability checked above
        Ok(unsafe { Self::new_unchecked(seed) })
    }

    /// Seed all lanes from `seed` without checking the backend
    ///
    /// # Safety
    /// `V::is_available()` must be true on the running host.
    pub unsafe fn new_unchecked(seed: u64) -> Self {
        let (s0, s1) = seed::expand_lanes::<V>(seed);
        let mut state = LaneState {
            s0: V::load(&s0),
            s1: V::load(&s1),
        };
        let mut buffer = V::zero_array();
        V::fill(&mut state, buffer.as_mut());
        Self {
            state,
            buffer,
            cursor: 0,
        }
    }

    /// Number of lanes (values produced per refill)
    pub const fn lanes(&self) -> usize {
        V::LANES
    }

    pub const fn backend_name(&self) -> &'static str {
        V::NAME
    }

    /// Values still waiting in the results buffer
    pub fn buffered(&self) -> usize {
        V::LANES - self.cursor
    }

    #[inline]
    fn refill(&mut self) {
        // Safety: struct invariant
        unsafe { V::fill(&mut self.state, self.buffer.as_mut()) };
        self.cursor = 0;
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        if self.cursor == V::LANES {
            self.refill();
        }
        let value = self.buffer.as_ref()[self.cursor];
        self.cursor += 1;
        value
    }

    /// High 32 bits of the next value
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform double in `[0, 1)` from the top 53 bits of the next value
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        u64_to_double(self.next_u64())
    }

    /// Uniform float in `[0, 1)` from the top 24 bits of the next value
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        u64_to_float(self.next_u64())
    }

    /// Fill `out` with the next `out.len()` values
    ///
    /// Equivalent to calling [`next_u64`](Self::next_u64) once per element:
    /// buffered values are drained first, whole multiples of the lane count
    /// are generated straight into `out`, and a partial tail is served from
    /// a fresh buffer whose remainder stays available.
    pub fn fill(&mut self, out: &mut [u64]) {
        let take = self.buffered().min(out.len());
        out[..take].copy_from_slice(&self.buffer.as_ref()[self.cursor..self.cursor + take]);
        self.cursor += take;

        let rest = &mut out[take..];
        if rest.is_empty() {
            return;
        }

        let whole = rest.len() - rest.len() % V::LANES;
        let (bulk, tail) = rest.split_at_mut(whole);
        if !bulk.is_empty() {
            // Safety: struct invariant
            unsafe { V::fill(&mut self.state, bulk) };
        }
        if !tail.is_empty() {
            self.refill();
            tail.copy_from_slice(&self.buffer.as_ref()[..tail.len()]);
            self.cursor = tail.len();
        }
    }

    /// Write the next `count` values to the front of `out`
    ///
    /// # Panics
    /// Panics if `count > out.len()`; see
    /// [`try_next_batch`](Self::try_next_batch) for the checked form.
    pub fn next_batch(&mut self, out: &mut [u64], count: usize) {
        self.fill(&mut out[..count]);
    }

    /// Checked form of [`next_batch`](Self::next_batch)
    pub fn try_next_batch(&mut self, out: &mut [u64], count: usize) -> Result<()> {
        let available = out.len();
        let dest = out.get_mut(..count).ok_or(Error::BufferTooSmall {
            requested: count,
            available,
        })?;
        self.fill(dest);
        Ok(())
    }

    /// Fill `out` with doubles in `[0, 1)`
    pub fn fill_doubles(&mut self, out: &mut [f64]) {
        for value in out.iter_mut() {
            *value = self.next_double();
        }
    }

    /// Fill `dest` with random bytes, little-endian per 64-bit value
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        const BLOCK: usize = 32;
        let mut words = [0u64; BLOCK];
        for chunk in dest.chunks_mut(BLOCK * 8) {
            let n = chunk.len().div_ceil(8);
            self.fill(&mut words[..n]);
            for word in &mut words[..n] {
                *word = word.to_le();
            }
            let bytes: &[u8] = bytemuck::cast_slice(&words[..n]);
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl ScalarGenerator {
    pub fn new(seed: u64) -> Self {
        // Safety: the scalar backend runs everywhere
        unsafe { Self::new_unchecked(seed) }
    }
}
