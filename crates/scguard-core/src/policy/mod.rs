pub mod engine;
pub mod model;
pub mod remediation;

pub use engine::PolicyEngine;
pub use model::{Decision, EnforcementResult};
