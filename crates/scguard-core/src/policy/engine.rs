//! Deployment decision engine.
//!
//! Maps a risk score and the per-category probabilities to an
//! [`EnforcementResult`]. The mapping is a total, pure function:
//!
//!   - score <  allow_below            → ALLOW
//!   - allow_below <= score < block_at → WARN
//!   - score >= block_at               → BLOCK
//!
//! Both boundaries are inclusive upward, so a score sitting exactly on a
//! threshold takes the stricter decision.

use tracing::debug;

use crate::config::{DecisionThresholds, PolicyProfile};
use crate::policy::model::{Decision, EnforcementResult};
use crate::policy::remediation::recommendations_for;
use crate::scoring::probability::Probabilities;
use crate::scoring::risk::{RiskAssessment, RiskCategory};

/// Probability above which a category counts as detected.
pub const DETECTION_PROBABILITY: f64 = 0.5;

/// Probability above which a category is named in a WARN justification.
pub const WARN_MENTION_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    thresholds: DecisionThresholds,
}

impl PolicyEngine {
    pub fn new(thresholds: DecisionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn from_profile(profile: &PolicyProfile) -> Self {
        Self::new(profile.thresholds)
    }

    pub fn decide(&self, risk_score: f64) -> Decision {
        if risk_score < self.thresholds.allow_below {
            Decision::Allow
        } else if risk_score < self.thresholds.block_at {
            Decision::Warn
        } else {
            Decision::Block
        }
    }

    pub fn enforce(&self, risk_score: f64, probabilities: &Probabilities) -> EnforcementResult {
        let decision = self.decide(risk_score);
        let detected_vulnerabilities = probabilities.above(DETECTION_PROBABILITY);
        let recommendations = recommendations_for(&detected_vulnerabilities);
        let justification = justification(decision, risk_score, probabilities);

        debug!(%decision, risk_score, detected = detected_vulnerabilities.len(), "policy enforced");

        EnforcementResult {
            decision,
            risk_score,
            risk_category: RiskCategory::from_score(risk_score),
            justification,
            recommendations,
            detected_vulnerabilities,
        }
    }

    pub fn enforce_assessment(&self, assessment: &RiskAssessment) -> EnforcementResult {
        self.enforce(assessment.overall_score, &assessment.probabilities)
    }
}

fn justification(decision: Decision, risk_score: f64, probabilities: &Probabilities) -> String {
    match decision {
        Decision::Allow => format!(
            "Risk score {risk_score:.1}/10 is below threshold. \
             No significant vulnerabilities detected by static analysis or ML models."
        ),
        Decision::Warn => format!(
            "Risk score {risk_score:.1}/10 indicates moderate risk. \
             Potential vulnerabilities: {}. \
             Manual review recommended before deployment.",
            percent_list(probabilities, WARN_MENTION_PROBABILITY)
        ),
        Decision::Block => format!(
            "Risk score {risk_score:.1}/10 exceeds safety threshold. \
             High probability of: {}. \
             Deployment blocked to prevent potential exploits.",
            percent_list(probabilities, DETECTION_PROBABILITY)
        ),
    }
}

/// `"reentrancy (90%), access_control (40%)"`, or `none`.
fn percent_list(probabilities: &Probabilities, threshold: f64) -> String {
    let entries: Vec<String> = probabilities
        .iter()
        .filter(|(_, p)| *p > threshold)
        .map(|(c, p)| format!("{c} ({:.0}%)", p * 100.0))
        .collect();

    if entries.is_empty() {
        "none".to_string()
    } else {
        entries.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::remediation::{GENERIC_RECOMMENDATION, MAX_RECOMMENDATIONS};
    use crate::scoring::category::VulnerabilityCategory::*;
    use crate::scoring::risk::RiskAggregator;

    fn probs(r: f64, u: f64, a: f64, d: f64) -> Probabilities {
        Probabilities::new()
            .with(Reentrancy, r)
            .with(UncheckedExternalCall, u)
            .with(AccessControl, a)
            .with(DangerousConstruct, d)
    }

    #[test]
    fn boundaries_are_inclusive_upward() {
        let engine = PolicyEngine::default();

        assert_eq!(engine.decide(0.0), Decision::Allow);
        assert_eq!(engine.decide(2.999), Decision::Allow);
        assert_eq!(engine.decide(3.0), Decision::Warn);
        assert_eq!(engine.decide(6.999), Decision::Warn);
        assert_eq!(engine.decide(7.0), Decision::Block);
        assert_eq!(engine.decide(10.0), Decision::Block);
    }

    #[test]
    fn all_zero_allows_with_generic_advice() {
        let result = PolicyEngine::default().enforce(0.0, &probs(0.0, 0.0, 0.0, 0.0));

        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.risk_category, RiskCategory::Low);
        assert_eq!(result.recommendations, vec![GENERIC_RECOMMENDATION]);
        assert!(result.detected_vulnerabilities.is_empty());
        assert_eq!(
            result.justification,
            "Risk score 0.0/10 is below threshold. \
             No significant vulnerabilities detected by static analysis or ML models."
        );
    }

    #[test]
    fn mostly_reentrancy_warns() {
        let p = probs(0.9, 0.2, 0.1, 0.0);
        let assessment = RiskAggregator::default().calculate_risk(&p, None);
        let result = PolicyEngine::default().enforce_assessment(&assessment);

        assert_eq!(result.decision, Decision::Warn);
        assert_eq!(result.risk_category, RiskCategory::Medium);
        assert_eq!(result.detected_vulnerabilities, vec![Reentrancy]);
        assert!(result.justification.starts_with("Risk score 3."));
        assert!(result.justification.ends_with(
            "/10 indicates moderate risk. \
             Potential vulnerabilities: reentrancy (90%). \
             Manual review recommended before deployment."
        ));
        assert_eq!(result.recommendations.len(), 4);
    }

    #[test]
    fn certain_reentrancy_alone_warns_on_the_boundary() {
        let p = probs(1.0, 0.0, 0.0, 0.0);
        let assessment = RiskAggregator::default().calculate_risk(&p, None);
        let result = PolicyEngine::default().enforce_assessment(&assessment);

        assert_eq!(result.risk_score, 3.0);
        assert_eq!(result.decision, Decision::Warn);
        assert_eq!(result.risk_category, RiskCategory::Medium);
    }

    #[test]
    fn block_lists_only_detected_categories() {
        let result = PolicyEngine::default().enforce(8.3, &probs(0.95, 0.4, 0.9, 0.7));

        assert_eq!(result.decision, Decision::Block);
        assert_eq!(result.risk_category, RiskCategory::Critical);
        assert_eq!(
            result.detected_vulnerabilities,
            vec![Reentrancy, AccessControl, DangerousConstruct]
        );
        assert_eq!(
            result.justification,
            "Risk score 8.3/10 exceeds safety threshold. \
             High probability of: reentrancy (95%), access_control (90%), dangerous_construct (70%). \
             Deployment blocked to prevent potential exploits."
        );
        assert_eq!(result.recommendations.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn warn_without_mentionable_categories_says_none() {
        let result = PolicyEngine::default().enforce(4.0, &probs(0.2, 0.1, 0.0, 0.0));

        assert_eq!(result.decision, Decision::Warn);
        assert!(result.justification.contains("Potential vulnerabilities: none."));
        assert_eq!(result.recommendations, vec![GENERIC_RECOMMENDATION]);
    }

    #[test]
    fn custom_thresholds() {
        let engine = PolicyEngine::new(DecisionThresholds {
            allow_below: 1.0,
            block_at: 2.0,
        });

        assert_eq!(engine.decide(0.5), Decision::Allow);
        assert_eq!(engine.decide(1.0), Decision::Warn);
        assert_eq!(engine.decide(2.0), Decision::Block);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let engine = PolicyEngine::default();
        let p = probs(0.6, 0.7, 0.2, 0.1);

        assert_eq!(engine.enforce(5.5, &p), engine.enforce(5.5, &p));
    }
}
