//! Generator configuration
//!
//! `RngConfig` is plain data: it derives serde so it can live in a larger
//! application config, and carries an optional tier cap that lets a
//! deployment pin a narrower tier without rebuilding.

use crate::detect::Tier;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Environment variable read by [`RngConfig::apply_env`]
pub const MAX_TIER_ENV: &str = "UNIVERSAL_RNG_MAX_TIER";

/// Recurrence family
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Algorithm {
    /// xoroshiro128+ with rotations (17, 49, 21, 28)
    #[default]
    Xoroshiro128Plus,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Xoroshiro128Plus => "xoroshiro128+",
        }
    }
}

/// Which floating-point accessor is primary
///
/// Does not change the underlying integer stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 53-bit doubles
    #[default]
    Double,
    /// 24-bit singles
    Single,
}

/// Construction parameters for [`UniversalRng`](crate::UniversalRng)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RngConfig {
    pub seed: u64,
    pub algorithm: Algorithm,
    pub precision: Precision,
    /// Widest tier the facade may bind; `None` means no cap
    pub max_tier: Option<Tier>,
}

impl RngConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_max_tier(mut self, tier: Tier) -> Self {
        self.max_tier = Some(tier);
        self
    }

    /// Overlay settings from the process environment
    ///
    /// Currently reads [`MAX_TIER_ENV`]. An unset or empty variable leaves
    /// the config untouched; an unparseable one is an error.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(MAX_TIER_ENV) {
            if !value.trim().is_empty() {
                self.max_tier = Some(value.parse()?);
            }
        }
        Ok(self)
    }

    /// Whether `tier` is allowed by the cap
    pub fn allows(&self, tier: Tier) -> bool {
        self.max_tier.map_or(true, |cap| tier <= cap)
    }
}
