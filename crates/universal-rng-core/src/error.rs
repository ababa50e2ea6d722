//! Error types for generator construction
//!
//! Generation itself never fails once a handle is bound; only tier
//! construction, facade initialization and the checked batch call
//! return errors.

use crate::detect::Tier;
use thiserror::Error;

/// Core error type for universal-rng operations
#[derive(Error, Debug)]
pub enum Error {
    /// A tier could not be constructed on this host or build
    #[error("Tier {tier} unavailable: {reason}")]
    TierUnavailable { tier: Tier, reason: String },

    /// No tier, not even scalar, produced a usable generator
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Batch request larger than the destination buffer
    #[error("Buffer too small: requested {requested} values, buffer holds {available}")]
    BufferTooSmall { requested: usize, available: usize },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Tier was compiled out of this build
    pub fn not_compiled(tier: Tier) -> Self {
        Self::TierUnavailable {
            tier,
            reason: format!("not compiled with the `{}` feature", tier.name()),
        }
    }

    /// CPU or operating system lacks support for the tier
    pub fn unsupported_cpu(tier: Tier) -> Self {
        Self::TierUnavailable {
            tier,
            reason: "CPU or OS does not support the required register state".to_string(),
        }
    }

    /// Unknown tier name in configuration
    pub fn unknown_tier(name: &str) -> Self {
        Self::InvalidConfig(format!(
            "unknown tier '{name}' (expected scalar, sse2, avx2, avx512 or tier-1/2/4/8)"
        ))
    }
}
