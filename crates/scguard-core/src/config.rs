//! Policy profiles: severity weights and decision thresholds.
//!
//! A profile is a plain value handed to the risk aggregator and the policy
//! engine, so several profiles can be used side by side in one process.
//! Profiles load from TOML; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::ConfigError;
use crate::scoring::category::VulnerabilityCategory;

/// Complete scoring and enforcement configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyProfile {
    pub weights: SeverityWeights,
    pub thresholds: DecisionThresholds,
}

impl PolicyProfile {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let profile: Self = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in VulnerabilityCategory::ALL {
            let value = self.weights.weight(category);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    category: category.to_string(),
                    value,
                });
            }
        }
        if self.weights.total() <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        let DecisionThresholds {
            allow_below,
            block_at,
        } = self.thresholds;
        if !allow_below.is_finite() || !block_at.is_finite() || allow_below > block_at {
            return Err(ConfigError::InvalidThresholds {
                allow_below,
                block_at,
            });
        }

        Ok(())
    }
}

/// Per-category severity. The sum is the score normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub reentrancy: f64,
    pub unchecked_external_call: f64,
    pub access_control: f64,
    pub dangerous_construct: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            reentrancy: 3.0,
            unchecked_external_call: 2.0,
            access_control: 2.5,
            dangerous_construct: 2.5,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, category: VulnerabilityCategory) -> f64 {
        match category {
            VulnerabilityCategory::Reentrancy => self.reentrancy,
            VulnerabilityCategory::UncheckedExternalCall => self.unchecked_external_call,
            VulnerabilityCategory::AccessControl => self.access_control,
            VulnerabilityCategory::DangerousConstruct => self.dangerous_construct,
        }
    }

    /// Sum in canonical category order.
    pub fn total(&self) -> f64 {
        VulnerabilityCategory::ALL
            .iter()
            .map(|c| self.weight(*c))
            .sum()
    }
}

/// Decision cut-offs on the 0-10 risk score.
///
/// `score < allow_below` allows, `score >= block_at` blocks, anything in
/// between warns. Both boundaries are inclusive upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    pub allow_below: f64,
    pub block_at: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            allow_below: 3.0,
            block_at: 7.0,
        }
    }
}
