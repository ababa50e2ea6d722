//! High-throughput pseudorandom numbers with runtime SIMD tier selection
//!
//! Umbrella crate re-exporting [`universal_rng_core`]. See that crate for
//! the architecture; most users only need [`UniversalRng`]:
//!
//! ```rust
//! use universal_rng::UniversalRng;
//!
//! let mut rng = UniversalRng::new(7)?;
//! let mut values = vec![0u64; 1000];
//! rng.fill(&mut values);
//! # Ok::<(), universal_rng::Error>(())
//! ```

pub use universal_rng_core::*;
