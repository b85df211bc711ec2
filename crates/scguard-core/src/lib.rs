pub mod batch;
pub mod config;
pub mod error;
pub mod facts;
pub mod features;
pub mod graph;
pub mod policy;
pub mod report;
pub mod scoring;
pub mod util;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::PolicyProfile;
use crate::facts::FactProvider;
use crate::features::FeatureExtractor;
use crate::policy::PolicyEngine;
use crate::report::model::{AnalysisInfo, Report, ToolInfo};
use crate::scoring::{ProbabilityProvider, RiskAggregator};
use crate::util::deterministic::normalize_warnings;

pub const TOOL_NAME: &str = "scguard";

/// JSON schema version of scguard reports.
/// This must be bumped only when the report layout changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Run the full pipeline: facts → features → probabilities → risk → decision.
///
/// Graph analysis failures degrade the report instead of failing it; fact,
/// extraction and provider failures are returned with context.
pub fn assess(
    facts: &dyn FactProvider,
    provider: &dyn ProbabilityProvider,
    profile: &PolicyProfile,
    tool: ToolInfo,
) -> Result<Report> {
    profile.validate().context("invalid policy profile")?;

    let contracts = facts.contracts().context("failed to obtain contract facts")?;
    debug!(contracts = contracts.len(), "facts loaded");

    let extraction = FeatureExtractor::new(&contracts)
        .extract_detailed()
        .context("feature extraction failed")?;

    let probabilities = provider
        .predict(&extraction.features)
        .context("probability provider failed")?;
    let importance = provider.feature_importance();

    let risk = RiskAggregator::from_profile(profile).calculate_risk(&probabilities, importance.as_ref());
    let enforcement = PolicyEngine::from_profile(profile).enforce_assessment(&risk);

    let mut warnings = extraction.warnings;
    normalize_warnings(&mut warnings);
    let analysis = if warnings.is_empty() {
        AnalysisInfo::ok()
    } else {
        warn!(warnings = warnings.len(), "analysis degraded");
        AnalysisInfo::degraded(warnings)
    };

    Ok(Report::new(
        tool,
        facts.input_info(),
        extraction.features,
        extraction.graph,
        analysis,
        risk,
        enforcement,
    ))
}
