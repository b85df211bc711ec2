use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::features::model::{FEATURE_COUNT, FeatureVector};
use crate::graph::model::CallGraphMetrics;
use crate::policy::model::EnforcementResult;
use crate::scoring::risk::RiskAssessment;

/// Top-level scguard report.
///
/// This struct is the stable JSON contract consumed by CI gates.
/// It must remain deterministic for identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub features: FeatureVector,
    /// `features` in fixed field order, as handed to the classifier.
    pub feature_vector: [f64; FEATURE_COUNT],
    /// Absent when call graph analysis failed.
    pub graph: Option<CallGraphMetrics>,
    pub analysis: AnalysisInfo,
    pub risk: RiskAssessment,
    pub enforcement: EnforcementResult,
}

impl Report {
    pub fn new(
        tool: ToolInfo,
        input: InputInfo,
        features: FeatureVector,
        graph: Option<CallGraphMetrics>,
        analysis: AnalysisInfo,
        risk: RiskAssessment,
        enforcement: EnforcementResult,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            input,
            feature_vector: features.to_array(),
            features,
            graph,
            analysis,
            risk,
            enforcement,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.enforcement.exit_code()
    }
}

/// Tool metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Fact document metadata bound to this report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: InputHash,
}

impl InputInfo {
    /// For facts that did not come from a document.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            size_bytes: 0,
            hash: InputHash {
                algorithm: "none".into(),
                value: String::new(),
            },
        }
    }
}

/// Cryptographic input fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputHash {
    pub algorithm: String,
    pub value: String,
}

/// Analysis status. `degraded` means the call graph features fell back to
/// zero; the warnings say why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisInfo {
    pub status: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            warnings: vec![],
        }
    }

    pub fn degraded(warnings: Vec<String>) -> Self {
        Self {
            status: "degraded".into(),
            warnings,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
