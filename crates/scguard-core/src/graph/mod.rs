pub mod analyze;
pub mod model;

pub use analyze::CallGraphAnalyzer;
pub use model::{CallGraph, CallGraphMetrics, CallGraphNode};
