//! Tier selection and the caller-facing generator handle
//!
//! [`UniversalRng`] binds exactly one backend at construction and forwards
//! every call to it. The binding is a closed enum, so each call is a single
//! predictable `match` rather than an indirect call.
//!
//! Probe order is widest first:
//!
//! ```text
//! avx512 ──unsupported / failed──▶ avx2 ──▶ sse2 ──▶ scalar ──failed──▶ Error::Initialization
//! ```
//!
//! Releasing the handle consumes it, so a released handle cannot be used
//! again.

use crate::config::{Algorithm, Precision, RngConfig};
use crate::detect::{CapabilityReport, Tier};
use crate::error::{Error, Result};
use crate::generator::ScalarGenerator;
use log::{debug, trace, warn};

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
use crate::generator::Sse2Generator;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
use crate::generator::Avx2Generator;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
use crate::generator::Avx512Generator;

/// The generator state behind a bound handle
#[derive(Clone, Debug)]
pub enum Backend {
    Scalar(ScalarGenerator),
    #[cfg(all(target_arch = "x86_64", feature = "sse2"))]
    Sse2(Box<Sse2Generator>),
    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    Avx2(Box<Avx2Generator>),
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    Avx512(Box<Avx512Generator>),
}

/// Run `$body` against whichever generator `$backend` holds
macro_rules! with_generator {
    ($backend:expr, $gen:ident => $body:expr) => {
        match $backend {
            Backend::Scalar($gen) => $body,
            #[cfg(all(target_arch = "x86_64", feature = "sse2"))]
            Backend::Sse2($gen) => $body,
            #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
            Backend::Avx2($gen) => $body,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            Backend::Avx512($gen) => $body,
        }
    };
}

impl Backend {
    /// Construct the generator for `tier`
    ///
    /// Fails with [`Error::TierUnavailable`] when the tier is compiled out
    /// or the host cannot run it, regardless of what any report claimed.
    pub fn build(tier: Tier, seed: u64) -> Result<Self> {
        match tier {
            Tier::Scalar => Ok(Backend::Scalar(ScalarGenerator::new(seed))),
            Tier::Sse2 => build_sse2(seed),
            Tier::Avx2 => build_avx2(seed),
            Tier::Avx512 => build_avx512(seed),
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Backend::Scalar(_) => Tier::Scalar,
            #[cfg(all(target_arch = "x86_64", feature = "sse2"))]
            Backend::Sse2(_) => Tier::Sse2,
            #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
            Backend::Avx2(_) => Tier::Avx2,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            Backend::Avx512(_) => Tier::Avx512,
        }
    }
}

#[cfg(all(target_arch = "x86_64", feature = "sse2"))]
fn build_sse2(seed: u64) -> Result<Backend> {
    Ok(Backend::Sse2(Box::new(Sse2Generator::try_new(seed)?)))
}

#[cfg(not(all(target_arch = "x86_64", feature = "sse2")))]
fn build_sse2(_seed: u64) -> Result<Backend> {
    Err(Error::not_compiled(Tier::Sse2))
}

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
fn build_avx2(seed: u64) -> Result<Backend> {
    Ok(Backend::Avx2(Box::new(Avx2Generator::try_new(seed)?)))
}

#[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
fn build_avx2(_seed: u64) -> Result<Backend> {
    Err(Error::not_compiled(Tier::Avx2))
}

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
fn build_avx512(seed: u64) -> Result<Backend> {
    Ok(Backend::Avx512(Box::new(Avx512Generator::try_new(seed)?)))
}

#[cfg(not(all(target_arch = "x86_64", feature = "avx512")))]
fn build_avx512(_seed: u64) -> Result<Backend> {
    Err(Error::not_compiled(Tier::Avx512))
}

/// Try tiers widest first and return the first that builds
///
/// Tiers above `config.max_tier` or missing from `report` are skipped.
/// A failed vector tier is logged and the next narrower one is tried.
/// Scalar is always attempted last; if it fails too the whole probe fails
/// with [`Error::Initialization`].
pub fn probe<T, F>(
    report: &CapabilityReport,
    config: &RngConfig,
    mut build: F,
) -> Result<(Tier, T)>
where
    F: FnMut(Tier) -> Result<T>,
{
    for tier in Tier::WIDEST_FIRST {
        if tier == Tier::Scalar {
            break;
        }
        if !config.allows(tier) {
            debug!("{tier} above configured cap, skipping");
            continue;
        }
        if !report.supports(tier) {
            debug!("{tier} not supported by CPU, skipping");
            continue;
        }
        match build(tier) {
            Ok(built) => return Ok((tier, built)),
            Err(e) => warn!("{tier} initialization failed, falling back: {e}"),
        }
    }

    build(Tier::Scalar)
        .map(|built| (Tier::Scalar, built))
        .map_err(|e| {
            Error::Initialization(format!("scalar generator could not be constructed: {e}"))
        })
}

/// Tier-independent random number generator handle
///
/// Not thread-safe for shared use (every call mutates the buffer); give
/// each thread its own instance with a distinct seed instead.
#[derive(Clone, Debug)]
pub struct UniversalRng {
    backend: Backend,
    algorithm: Algorithm,
    precision: Precision,
}

impl UniversalRng {
    /// Bind the best available tier for `seed` with default settings
    pub fn new(seed: u64) -> Result<Self> {
        Self::with_config(&RngConfig::new(seed))
    }

    /// Detect the host and bind the best tier allowed by `config`
    pub fn with_config(config: &RngConfig) -> Result<Self> {
        let report = CapabilityReport::detect();
        debug!("CPU feature detection: {report}");
        Self::with_capabilities(config, &report)
    }

    /// Bind using a caller-supplied capability report
    ///
    /// A report may only narrow the choice: a tier it claims but the host
    /// cannot run fails construction and falls back like any other failure.
    pub fn with_capabilities(config: &RngConfig, report: &CapabilityReport) -> Result<Self> {
        let (tier, backend) = probe(report, config, |tier| Backend::build(tier, config.seed))?;
        debug!(
            "Using {} implementation ({}, {} lanes)",
            tier,
            tier.label(),
            tier.lanes()
        );

        Ok(Self {
            backend,
            algorithm: config.algorithm,
            precision: config.precision,
        })
    }

    /// Name of the bound tier (`"scalar"`, `"sse2"`, `"avx2"`, `"avx512"`)
    pub fn implementation_name(&self) -> &'static str {
        self.tier().name()
    }

    pub fn tier(&self) -> Tier {
        self.backend.tier()
    }

    /// Values produced per refill of the bound tier
    pub fn lanes(&self) -> usize {
        self.tier().lanes()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        with_generator!(&mut self.backend, g => g.next_u64())
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        with_generator!(&mut self.backend, g => g.next_u32())
    }

    #[inline]
    pub fn next_double(&mut self) -> f64 {
        with_generator!(&mut self.backend, g => g.next_double())
    }

    #[inline]
    pub fn next_float(&mut self) -> f32 {
        with_generator!(&mut self.backend, g => g.next_float())
    }

    /// Uniform `[0, 1)` value at the configured precision
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        match self.precision {
            Precision::Double => self.next_double(),
            Precision::Single => f64::from(self.next_float()),
        }
    }

    /// Fill `out` with the next `out.len()` values
    pub fn fill(&mut self, out: &mut [u64]) {
        with_generator!(&mut self.backend, g => g.fill(out))
    }

    /// Write the next `count` values to the front of `out`
    ///
    /// # Panics
    /// Panics if `count > out.len()`.
    pub fn next_batch(&mut self, out: &mut [u64], count: usize) {
        with_generator!(&mut self.backend, g => g.next_batch(out, count))
    }

    /// Checked form of [`next_batch`](Self::next_batch)
    pub fn try_next_batch(&mut self, out: &mut [u64], count: usize) -> Result<()> {
        with_generator!(&mut self.backend, g => g.try_next_batch(out, count))
    }

    pub fn fill_doubles(&mut self, out: &mut [f64]) {
        with_generator!(&mut self.backend, g => g.fill_doubles(out))
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        with_generator!(&mut self.backend, g => g.fill_bytes(dest))
    }

    /// Values still buffered in the bound generator
    pub fn buffered(&self) -> usize {
        with_generator!(&self.backend, g => g.buffered())
    }

    /// Release the generator state
    pub fn release(self) {
        trace!("Releasing {} generator", self.implementation_name());
    }
}
