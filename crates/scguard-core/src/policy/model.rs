use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::category::VulnerabilityCategory;
use crate::scoring::risk::RiskCategory;

/// Deployment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Warn,
    Block,
}

impl Decision {
    /// CI-compatible process exit code.
    ///
    /// - ALLOW → 0
    /// - WARN  → 1
    /// - BLOCK → 2
    pub fn exit_code(self) -> i32 {
        match self {
            Decision::Allow => 0,
            Decision::Warn => 1,
            Decision::Block => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Warn => "WARN",
            Decision::Block => "BLOCK",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of policy enforcement for one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementResult {
    pub decision: Decision,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub justification: String,
    /// At most five, no repeats.
    pub recommendations: Vec<String>,
    /// Categories with probability above 0.5, canonical order.
    pub detected_vulnerabilities: Vec<VulnerabilityCategory>,
}

impl EnforcementResult {
    pub fn exit_code(&self) -> i32 {
        self.decision.exit_code()
    }
}
