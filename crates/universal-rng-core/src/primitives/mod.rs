//! Vector-math primitives behind the generators
//!
//! # Architecture
//!
//! - One trait, [`LaneVector`], for add / xor / or / shift / rotate over W lanes
//! - Concrete backends: `ScalarLane` (1), `PortableLanes<W>` (any W),
//!   `Sse2Lanes` (2), `Avx2Lanes` (4), `Avx512Lanes` (8)
//! - Hardware backends are compiled behind their Cargo feature on x86_64 and
//!   validated at runtime by the capability detector
//!
//! Values of a hardware backend only exist inside a generator that already
//! checked availability, so the `unsafe` surface stays inside this crate.

pub mod backends;
pub mod traits;

pub use backends::{PortableLanes, ScalarLane};
#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub use backends::Sse2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use backends::Avx2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub use backends::Avx512Lanes;
pub use traits::{LaneState, LaneVector};
