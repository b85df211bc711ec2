//! Aggregation of per-category probabilities into a single 0-10 risk score.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::{PolicyProfile, SeverityWeights};
use crate::scoring::category::VulnerabilityCategory;
use crate::scoring::probability::{FeatureImportance, Probabilities};

/// Probability above which a category is reported as a risk factor.
pub const RISK_FACTOR_PROBABILITY: f64 = 0.5;

/// Importance above which a feature is reported as a risk factor.
pub const RISK_FACTOR_IMPORTANCE: f64 = 0.1;

/// Most important features listed among the risk factors.
pub const MAX_IMPORTANT_FEATURES: usize = 3;

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// In `[0, 10]`.
    pub overall_score: f64,
    pub probabilities: Probabilities,
    pub top_risk_factors: Vec<String>,
    /// In `[0, 1]`; 0 when every probability is 0.5 or nothing was supplied.
    pub confidence: f64,
}

impl RiskAssessment {
    pub fn risk_category(&self) -> RiskCategory {
        RiskCategory::from_score(self.overall_score)
    }
}

/// Coarse banding of the risk score. Independent of the policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    pub fn from_score(score: f64) -> Self {
        if score < 3.0 {
            RiskCategory::Low
        } else if score < 5.0 {
            RiskCategory::Medium
        } else if score < 7.0 {
            RiskCategory::High
        } else {
            RiskCategory::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
            RiskCategory::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted aggregation of classifier output. Pure; holds only its weights.
#[derive(Debug, Clone, Default)]
pub struct RiskAggregator {
    weights: SeverityWeights,
}

impl RiskAggregator {
    pub fn new(weights: SeverityWeights) -> Self {
        Self { weights }
    }

    pub fn from_profile(profile: &PolicyProfile) -> Self {
        Self::new(profile.weights)
    }

    pub fn weights(&self) -> &SeverityWeights {
        &self.weights
    }

    pub fn calculate_risk(
        &self,
        probabilities: &Probabilities,
        importance: Option<&FeatureImportance>,
    ) -> RiskAssessment {
        let (probabilities, changed) = probabilities.sanitized();
        if changed {
            warn!("probabilities outside [0, 1] were clamped before scoring");
        }

        let overall_score = self.score(&probabilities);
        let top_risk_factors = top_risk_factors(&probabilities, importance);
        let confidence = confidence(&probabilities);

        debug!(overall_score, confidence, "risk aggregated");

        RiskAssessment {
            overall_score,
            probabilities,
            top_risk_factors,
            confidence,
        }
    }

    pub fn risk_category(score: f64) -> RiskCategory {
        RiskCategory::from_score(score)
    }

    /// `Σ p·w · 10 / Σ w`, clamped to `[0, 10]`. Missing categories count as 0.
    fn score(&self, probabilities: &Probabilities) -> f64 {
        let total = self.weights.total();
        if total <= 0.0 || !total.is_finite() {
            return 0.0;
        }

        let weighted: f64 = VulnerabilityCategory::ALL
            .iter()
            .map(|c| probabilities.get(*c) * self.weights.weight(*c))
            .sum();

        (weighted * MAX_SCORE / total).clamp(0.0, MAX_SCORE)
    }
}

fn top_risk_factors(
    probabilities: &Probabilities,
    importance: Option<&FeatureImportance>,
) -> Vec<String> {
    let mut factors: Vec<String> = probabilities
        .iter()
        .filter(|(_, p)| *p > RISK_FACTOR_PROBABILITY)
        .map(|(c, p)| format!("{c} (prob={p:.2})"))
        .collect();

    if let Some(importance) = importance {
        factors.extend(
            importance
                .top(MAX_IMPORTANT_FEATURES, RISK_FACTOR_IMPORTANCE)
                .into_iter()
                .map(|(name, w)| format!("{name} (importance={w:.2})")),
        );
    }

    factors
}

/// Mean distance from 0.5, normalized by the maximum distance.
fn confidence(probabilities: &Probabilities) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let sum: f64 = probabilities.iter().map(|(_, p)| (p - 0.5).abs()).sum();
    (sum / probabilities.len() as f64) / 0.5
}
