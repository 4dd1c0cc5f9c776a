use crate::constants::DEFAULT_BATCH_SIZE;
use crate::error::{CostError, Result};
use crate::types::MissPolicy;
use std::env;
use std::path::PathBuf;

pub const MISS_POLICY_VAR: &str = "CONVO_COST_MISS_POLICY";
pub const BATCH_SIZE_VAR: &str = "CONVO_COST_BATCH_SIZE";
pub const PRICING_FILE_VAR: &str = "CONVO_COST_PRICING_FILE";

/// Runtime settings for pricing resolution and batch fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct CostConfig {
    pub miss_policy: MissPolicy,
    pub batch_size: usize,
    /// Explicit pricing table file; the per-user default is tried when unset
    pub pricing_file: Option<PathBuf>,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            miss_policy: MissPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            pricing_file: None,
        }
    }
}

impl CostConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup. Unset and empty
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read(MISS_POLICY_VAR) {
            config.miss_policy = value.parse::<MissPolicy>().map_err(|_| CostError::InvalidConfig {
                var: MISS_POLICY_VAR.to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = read(BATCH_SIZE_VAR) {
            config.batch_size = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| CostError::InvalidConfig {
                    var: BATCH_SIZE_VAR.to_string(),
                    value: value.clone(),
                })?;
        }

        config.pricing_file = read(PRICING_FILE_VAR).map(PathBuf::from);

        Ok(config)
    }

    /// Per-user pricing override location (~/.config/convo-cost/pricing.json)
    pub fn default_pricing_file() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".config").join("convo-cost").join("pricing.json"))
    }

    /// The pricing file to load, if any: the configured one, else the
    /// per-user default when it exists
    pub fn pricing_file_path(&self) -> Option<PathBuf> {
        self.pricing_file
            .clone()
            .or_else(|| Self::default_pricing_file().filter(|path| path.exists()))
    }
}
