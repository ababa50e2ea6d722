//! Runtime-dispatched SIMD pseudorandom number generation
//!
//! This crate runs the xoroshiro128+ recurrence across as many parallel
//! lanes as the running processor supports, choosing the tier once at
//! construction and hiding it behind one handle.
//!
//! # Architecture Overview
//!
//! 1. **Detection** - [`detect`] reads CPUID/XCR0 on demand and reports
//!    which tiers the CPU *and* OS can run
//! 2. **Primitives** - [`primitives::LaneVector`] abstracts per-lane
//!    add/xor/shift/rotate; scalar, portable, SSE2, AVX2 and AVX-512
//!    backends implement it
//! 3. **Generators** - [`LaneGenerator`] writes the recurrence once and
//!    manages the per-tier results buffer and cursor
//! 4. **Dispatch** - [`UniversalRng`] probes tiers widest first and binds
//!    the first that constructs
//!
//! Each tier produces a different sequence for the same seed (lane `i` is
//! seeded from `seed + i`); within a tier the sequence is deterministic.
//!
//! # Example
//!
//! ```rust
//! use universal_rng_core::{RngConfig, UniversalRng};
//!
//! let mut rng = UniversalRng::with_config(&RngConfig::new(42))?;
//! println!("bound tier: {}", rng.implementation_name());
//!
//! let x = rng.next_u64();
//! let u = rng.next_double();
//! assert!((0.0..1.0).contains(&u));
//!
//! let mut batch = [0u64; 10];
//! rng.next_batch(&mut batch, 10);
//! # let _ = x;
//! # Ok::<(), universal_rng_core::Error>(())
//! ```

pub mod config;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod generator;
pub mod primitives;

#[cfg(feature = "parallel")]
pub mod parallel;
#[cfg(feature = "rand")]
pub mod rand_compat;

pub use config::{Algorithm, Precision, RngConfig, MAX_TIER_ENV};
pub use detect::{detect, CapabilityReport, CpuidSource, HostCpuid, Tier, TierSet};
pub use dispatch::{probe, Backend, UniversalRng};
pub use error::{Error, Result};
pub use generator::{LaneGenerator, PortableGenerator, ScalarGenerator};

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub use generator::Sse2Generator;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use generator::Avx2Generator;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub use generator::Avx512Generator;

#[cfg(feature = "parallel")]
pub use parallel::par_fill;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CapabilityReport, Error, LaneGenerator, Precision, Result, RngConfig, ScalarGenerator,
        Tier, UniversalRng,
    };
}
