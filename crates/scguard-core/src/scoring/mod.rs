pub mod category;
pub mod probability;
pub mod risk;

pub use category::VulnerabilityCategory;
pub use probability::{FeatureImportance, FixedProbabilities, Probabilities, ProbabilityProvider};
pub use risk::{RiskAggregator, RiskAssessment, RiskCategory};
