use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

use crate::error::ProviderError;
use crate::features::model::FeatureVector;
use crate::scoring::category::VulnerabilityCategory;

/// Per-category vulnerability probabilities.
///
/// A category that is absent counts as probability 0 when scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probabilities(BTreeMap<VulnerabilityCategory, f64>);

impl Probabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: VulnerabilityCategory, probability: f64) -> Self {
        self.0.insert(category, probability);
        self
    }

    /// Probability of `category`, 0 when absent.
    pub fn get(&self, category: VulnerabilityCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Supplied entries in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (VulnerabilityCategory, f64)> + '_ {
        self.0.iter().map(|(c, p)| (*c, *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories whose probability exceeds `threshold`, canonical order.
    pub fn above(&self, threshold: f64) -> Vec<VulnerabilityCategory> {
        self.iter()
            .filter(|(_, p)| *p > threshold)
            .map(|(c, _)| c)
            .collect()
    }

    /// Copy with every value clamped into `[0, 1]`; non-finite values become 0.
    /// The flag reports whether anything changed.
    pub fn sanitized(&self) -> (Self, bool) {
        let mut changed = false;
        let map = self
            .0
            .iter()
            .map(|(c, p)| {
                let clean = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
                changed |= clean.to_bits() != p.to_bits();
                (*c, clean)
            })
            .collect();
        (Self(map), changed)
    }
}

impl FromIterator<(VulnerabilityCategory, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (VulnerabilityCategory, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Optional feature-importance hints from the classifier (feature → weight).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureImportance(BTreeMap<String, f64>);

impl FeatureImportance {
    /// Entries with weight above `min_weight`, heaviest first, at most `limit`.
    /// Equal weights keep name order.
    pub fn top(&self, limit: usize, min_weight: f64) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .0
            .iter()
            .filter(|(_, w)| **w > min_weight)
            .map(|(name, w)| (name.as_str(), *w))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

impl FromIterator<(String, f64)> for FeatureImportance {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Capability interface of the external classifier.
pub trait ProbabilityProvider {
    /// One probability in `[0, 1]` per category.
    fn predict(&self, features: &FeatureVector) -> Result<Probabilities, ProviderError>;

    fn feature_importance(&self) -> Option<FeatureImportance> {
        None
    }
}

/// Provider that returns precomputed classifier output regardless of input.
#[derive(Debug, Clone, Default)]
pub struct FixedProbabilities {
    pub probabilities: Probabilities,
    pub importance: Option<FeatureImportance>,
}

impl FixedProbabilities {
    pub fn new(probabilities: Probabilities) -> Self {
        Self {
            probabilities,
            importance: None,
        }
    }

    pub fn with_importance(mut self, importance: FeatureImportance) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Reads a `{ "<category>": <probability>, ... }` JSON object.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        Ok(Self::new(read_json(path)?))
    }

    /// Reads a `{ "<feature>": <weight>, ... }` JSON object.
    pub fn load_importance(mut self, path: &Path) -> Result<Self, ProviderError> {
        self.importance = Some(read_json(path)?);
        Ok(self)
    }
}

impl ProbabilityProvider for FixedProbabilities {
    fn predict(&self, _features: &FeatureVector) -> Result<Probabilities, ProviderError> {
        Ok(self.probabilities.clone())
    }

    fn feature_importance(&self) -> Option<FeatureImportance> {
        self.importance.clone()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let display = path.display().to_string();
    let bytes = fs::read(path)
        .map_err(|e| ProviderError::Unavailable(format!("failed to read {display}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|source| ProviderError::Parse {
        path: display,
        source,
    })
}
