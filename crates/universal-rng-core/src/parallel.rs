//! Parallel bulk generation with independent per-chunk streams
//!
//! A single generator must not be shared across threads. Instead each
//! chunk gets its own [`UniversalRng`] seeded at
//! `seed + index * STREAM_STRIDE`; with lane seeds spanning at most eight
//! consecutive values, the stride keeps every chunk's lane seeds disjoint.

use crate::config::RngConfig;
use crate::detect::CapabilityReport;
use crate::dispatch::UniversalRng;
use crate::error::{Error, Result};
use rayon::prelude::*;

/// Seed distance between consecutive streams
pub const STREAM_STRIDE: u64 = 1 << 32;

/// Seed of stream `index` derived from `base`
pub fn stream_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add((index as u64).wrapping_mul(STREAM_STRIDE))
}

/// Fill `out` in `chunk_len`-sized pieces on the rayon pool
///
/// The result depends only on `config`, `chunk_len` and the tier bound on
/// this host, not on thread scheduling.
pub fn par_fill(config: &RngConfig, out: &mut [u64], chunk_len: usize) -> Result<()> {
    if chunk_len == 0 {
        return Err(Error::InvalidConfig("chunk_len must be positive".to_string()));
    }

    let report = CapabilityReport::detect();
    out.par_chunks_mut(chunk_len)
        .enumerate()
        .try_for_each(|(index, chunk)| {
            let stream = config.clone().with_seed(stream_seed(config.seed, index));
            let mut rng = UniversalRng::with_capabilities(&stream, &report)?;
            rng.fill(chunk);
            Ok(())
        })
}
