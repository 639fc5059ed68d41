//! Engine configuration.
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! backward_policy = "hold"
//! placeholder_duration_days = 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dates::PLACEHOLDER_DURATION_DAYS;
use crate::error::ConfigError;

/// What happens to successors when the root moves earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackwardPolicy {
    /// Pull a successor earlier by at most how far its moved predecessors
    /// went, never past a bound set by any other predecessor.
    #[default]
    Follow,
    /// Successors never move earlier; only violated constraints move items.
    Hold,
}

/// Propagation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Behaviour for backward moves.
    pub backward_policy: BackwardPolicy,
    /// Duration reported for items missing a start or due date.
    pub placeholder_duration_days: i64,
}

impl PropagationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            backward_policy: BackwardPolicy::Follow,
            placeholder_duration_days: PLACEHOLDER_DURATION_DAYS,
        }
    }

    /// Sets the backward policy.
    pub fn with_backward_policy(mut self, policy: BackwardPolicy) -> Self {
        self.backward_policy = policy;
        self
    }

    /// Sets the placeholder duration.
    ///
    /// Rejects values below one day, as TOML loading does.
    pub fn with_placeholder_duration(mut self, days: i64) -> Result<Self, ConfigError> {
        self.placeholder_duration_days = days;
        self.validate()?;
        Ok(self)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder_duration_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "placeholder_duration_days must be at least 1, got {}",
                self.placeholder_duration_days
            )));
        }
        Ok(())
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self::new()
    }
}
