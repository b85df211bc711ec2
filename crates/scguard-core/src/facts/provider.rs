use crate::error::FactError;
use crate::facts::model::ContractFact;
use crate::report::model::InputInfo;

/// Capability interface of the static-analysis front end.
///
/// Any implementation (a real compiler front end, a JSON document, a test
/// fixture) is interchangeable; the core never depends on a specific tool.
pub trait FactProvider {
    /// All contracts of one analysis run, in source order.
    fn contracts(&self) -> Result<Vec<ContractFact>, FactError>;

    /// Identity of the facts for the report.
    fn input_info(&self) -> InputInfo {
        InputInfo::in_memory()
    }
}

/// Facts that were already assembled in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFacts {
    pub contracts: Vec<ContractFact>,
}

impl InMemoryFacts {
    pub fn new(contracts: Vec<ContractFact>) -> Self {
        Self { contracts }
    }
}

impl FactProvider for InMemoryFacts {
    fn contracts(&self) -> Result<Vec<ContractFact>, FactError> {
        Ok(self.contracts.clone())
    }
}
