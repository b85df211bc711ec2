//! Error types, one enum per subsystem.

use thiserror::Error;

/// Failure to obtain contract facts from a provider.
#[derive(Debug, Error)]
pub enum FactError {
    #[error("failed to read fact document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fact document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Malformed or missing fact data in one contract.
///
/// Scoped to the failing contract; other contracts of a batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature extraction failed for contract `{contract}`: {reason}")]
pub struct FeatureExtractionError {
    pub contract: String,
    pub reason: ExtractionFailure,
}

impl FeatureExtractionError {
    pub fn new(contract: impl Into<String>, reason: ExtractionFailure) -> Self {
        Self {
            contract: contract.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("contract id is empty")]
    EmptyContractId,

    #[error("function at index {index} has an empty id")]
    EmptyFunctionId { index: usize },

    #[error("call sites of `{function}` are not in control-flow order")]
    UnorderedCallSites { function: String },

    #[error("state writes of `{function}` are not in control-flow order")]
    UnorderedStateWrites { function: String },
}

/// Call graph construction failure. Swallowed by the feature extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallGraphError {
    #[error("call site in `{caller}` resolves to a target with an empty function id")]
    EmptyCallTarget { caller: String },
}

/// Invalid policy profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("severity weight for `{category}` must be finite and non-negative, got {value}")]
    InvalidWeight { category: String, value: f64 },

    #[error("severity weights sum to zero")]
    ZeroTotalWeight,

    #[error("decision thresholds must be finite with allow_below <= block_at, got {allow_below} / {block_at}")]
    InvalidThresholds { allow_below: f64, block_at: f64 },
}

/// Failure inside a probability provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("probability provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed probability document {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
