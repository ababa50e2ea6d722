//! Backend implementations of [`LaneVector`](super::LaneVector)
//!
//! Plain types with direct implementations: no Box, no dyn. The facade
//! picks one at runtime and monomorphizes the generator over it.

pub mod portable;
pub mod scalar;
#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub mod sse2;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub mod avx2;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub mod avx512;

pub use portable::PortableLanes;
pub use scalar::ScalarLane;
#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
pub use sse2::Sse2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use avx2::Avx2Lanes;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub use avx512::Avx512Lanes;
