//! Per-contract feature extraction over a batch, one worker per contract.
//!
//! Each contract gets its own `FeatureExtractor` and therefore its own
//! `CallGraphAnalyzer` with its own depth memo; nothing is shared between
//! workers. Calls into other contracts of the batch resolve to placeholder
//! nodes.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::FeatureExtractionError;
use crate::facts::model::ContractFact;
use crate::features::{FeatureExtractor, FeatureVector};

/// Extraction result for one contract of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractOutcome {
    pub contract: String,
    #[serde(serialize_with = "serialize_result")]
    pub result: Result<FeatureVector, FeatureExtractionError>,
}

impl ContractOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Extract every concrete contract independently, in parallel.
///
/// Output order equals input order; interfaces and libraries are skipped.
/// A failing contract yields its own `Err` and does not affect the others.
pub fn extract_each(contracts: &[ContractFact]) -> Vec<ContractOutcome> {
    let outcomes: Vec<ContractOutcome> = contracts
        .par_iter()
        .filter(|c| c.is_concrete())
        .map(|contract| ContractOutcome {
            contract: contract.id.clone(),
            result: FeatureExtractor::new(std::slice::from_ref(contract)).extract(),
        })
        .collect();

    debug!(
        contracts = outcomes.len(),
        failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
        "batch extracted"
    );

    outcomes
}

fn serialize_result<S>(
    result: &Result<FeatureVector, FeatureExtractionError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(1))?;
    match result {
        Ok(features) => map.serialize_entry("features", features)?,
        Err(e) => map.serialize_entry("error", &e.to_string())?,
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionFailure;
    use crate::facts::model::{CalleeKind, ContractKind, Visibility};
    use crate::facts::testing::{call, contract, function, write};

    fn vault(id: &str, external_calls: usize) -> ContractFact {
        let mut f = function("withdraw", Visibility::Public);
        for i in 0..external_calls {
            f.call_sites.push(call(CalleeKind::ExternalCall, "call", 10 + i as u32));
        }
        f.state_writes.push(write("balances", 1));
        contract(id, vec![f])
    }

    #[test]
    fn preserves_input_order() {
        let contracts: Vec<ContractFact> = (0..32).map(|i| vault(&format!("C{i}"), i % 3)).collect();

        let outcomes = extract_each(&contracts);

        let ids: Vec<&str> = outcomes.iter().map(|o| o.contract.as_str()).collect();
        let expected: Vec<String> = (0..32).map(|i| format!("C{i}")).collect();
        assert_eq!(ids, expected);
        for (i, outcome) in outcomes.iter().enumerate() {
            let features = outcome.result.as_ref().unwrap();
            assert_eq!(features.external_call_count, (i % 3) as u64);
        }
    }

    #[test]
    fn failure_is_scoped_to_its_contract() {
        let mut broken = vault("Broken", 1);
        broken.functions.push(function("", Visibility::Public));
        let contracts = vec![vault("A", 1), broken, vault("B", 2)];

        let outcomes = extract_each(&contracts);

        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(FeatureExtractionError::new(
                "Broken",
                ExtractionFailure::EmptyFunctionId { index: 1 }
            ))
        );
        assert_eq!(outcomes[2].result.as_ref().unwrap().external_call_count, 2);
    }

    #[test]
    fn skips_non_concrete_contracts() {
        let mut iface = vault("IToken", 1);
        iface.kind = ContractKind::Interface;
        let contracts = vec![iface, vault("Token", 0)];

        let outcomes = extract_each(&contracts);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].contract, "Token");
    }

    #[test]
    fn matches_sequential_extraction() {
        let contracts: Vec<ContractFact> = (0..8).map(|i| vault(&format!("V{i}"), i)).collect();

        let parallel = extract_each(&contracts);

        for (contract, outcome) in contracts.iter().zip(&parallel) {
            let sequential = FeatureExtractor::new(std::slice::from_ref(contract)).extract();
            assert_eq!(outcome.result, sequential);
        }
    }

    #[test]
    fn serializes_ok_and_error_entries() {
        let mut broken = vault("Broken", 0);
        broken.id = String::new();
        let outcomes = extract_each(&[vault("A", 1), broken]);

        let value = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(value[0]["contract"], "A");
        assert_eq!(value[0]["result"]["features"]["external_call_count"], 1);
        assert!(value[1]["result"]["error"].as_str().unwrap().contains("contract id is empty"));
    }
}
