//! Matcher configuration

use crate::policy::PolicyVersion;
use crate::weights::ScoreWeights;
use pillx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatcherConfig {
    /// Maximum number of candidates returned
    pub limit: usize,
    pub policy: PolicyVersion,
    /// Candidate count at which scoring moves onto the rayon pool
    pub parallel_threshold: usize,
    /// Caps and bonuses of the v2 policy
    pub weights: ScoreWeights,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            policy: PolicyVersion::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            weights: ScoreWeights::default(),
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfig("limit must be at least 1".to_string()));
        }
        self.weights
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MatcherConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
