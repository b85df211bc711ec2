pub mod extract;
pub mod model;

pub use extract::{Extraction, FeatureExtractor, extract_features};
pub use model::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
