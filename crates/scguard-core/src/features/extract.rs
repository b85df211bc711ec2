//! Deterministic feature extraction from contract facts.
//!
//! Every concrete contract is scanned once; counts accumulate into a single
//! `FeatureVector` for the whole compilation unit. The three graph-derived
//! features come from one `CallGraphAnalyzer` run over the same facts and
//! fall back to zero when the graph cannot be built.

use tracing::{debug, warn};

use crate::error::{ExtractionFailure, FeatureExtractionError};
use crate::facts::model::{CallSite, CalleeKind, ContractFact, FunctionFact, Visibility};
use crate::features::model::FeatureVector;
use crate::graph::{CallGraphAnalyzer, CallGraphMetrics};

const ACCESS_CONTROL_PATTERNS: [&str; 5] = ["only", "require", "auth", "admin", "owner"];
const REENTRANCY_GUARD_PATTERNS: [&str; 5] = ["nonreentrant", "noreentrancy", "mutex", "lock", "guard"];
const SELFDESTRUCT_PATTERNS: [&str; 2] = ["selfdestruct", "suicide"];

/// Feature vector plus what the extractor learned along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureVector,
    /// `None` when graph analysis failed and the graph features defaulted.
    pub graph: Option<CallGraphMetrics>,
    pub warnings: Vec<String>,
}

pub struct FeatureExtractor<'a> {
    contracts: &'a [ContractFact],
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(contracts: &'a [ContractFact]) -> Self {
        Self { contracts }
    }

    pub fn extract(&self) -> Result<FeatureVector, FeatureExtractionError> {
        self.extract_detailed().map(|e| e.features)
    }

    pub fn extract_detailed(&self) -> Result<Extraction, FeatureExtractionError> {
        let mut features = FeatureVector::default();
        let mut warnings = Vec::new();

        for contract in self.contracts.iter().filter(|c| c.is_concrete()) {
            validate(contract)?;
            accumulate(&mut features, contract);
        }

        let graph = match CallGraphAnalyzer::new(self.contracts).analyze() {
            Ok(metrics) => {
                features.max_call_depth = metrics.max_call_depth;
                features.has_cycle_with_external_call = metrics.has_cycle_with_external_call();
                features.external_calls_in_cycles = metrics.external_calls_in_cycles;
                Some(metrics)
            }
            Err(e) => {
                warn!(error = %e, "call graph analysis failed; graph features default to zero");
                warnings.push(format!("call graph analysis failed: {e}"));
                None
            }
        };

        debug!(features = ?features.to_array(), "features extracted");

        Ok(Extraction {
            features,
            graph,
            warnings,
        })
    }
}

/// Convenience wrapper around `FeatureExtractor::extract`.
pub fn extract_features(contracts: &[ContractFact]) -> Result<FeatureVector, FeatureExtractionError> {
    FeatureExtractor::new(contracts).extract()
}

fn validate(contract: &ContractFact) -> Result<(), FeatureExtractionError> {
    let fail = |reason| Err(FeatureExtractionError::new(&contract.id, reason));

    if contract.id.is_empty() {
        return fail(ExtractionFailure::EmptyContractId);
    }

    for (index, function) in contract.functions.iter().enumerate() {
        if function.id.is_empty() {
            return fail(ExtractionFailure::EmptyFunctionId { index });
        }
        // Several calls may share a statement, so equal positions are allowed.
        if !function.call_sites.is_sorted_by_key(|s| s.position) {
            return fail(ExtractionFailure::UnorderedCallSites {
                function: function.id.clone(),
            });
        }
        if !function.state_writes.is_sorted_by_key(|w| w.position) {
            return fail(ExtractionFailure::UnorderedStateWrites {
                function: function.id.clone(),
            });
        }
    }

    Ok(())
}

fn accumulate(features: &mut FeatureVector, contract: &ContractFact) {
    for function in &contract.functions {
        if !function.skips_call_analysis() {
            count_calls(features, function);

            let (before, after) = writes_around_first_external_call(function);
            features.state_writes_before_call = features.state_writes_before_call.saturating_add(before);
            features.state_writes_after_call = features.state_writes_after_call.saturating_add(after);
        }

        if !function.is_special() {
            let slot = match function.visibility {
                Visibility::Public => Some(&mut features.public_function_count),
                Visibility::External => Some(&mut features.external_function_count),
                Visibility::Private => Some(&mut features.private_function_count),
                Visibility::Internal => None,
            };
            if let Some(count) = slot {
                *count = count.saturating_add(1);
            }
        }

        scan_dangerous_constructs(features, function);
    }

    let modifier_names = contract
        .modifiers
        .iter()
        .map(|m| m.name.as_str())
        .chain(contract.functions.iter().flat_map(|f| f.modifiers.iter().map(String::as_str)));
    for name in modifier_names {
        let lowered = name.to_lowercase();
        if ACCESS_CONTROL_PATTERNS.iter().any(|p| lowered.contains(p)) {
            features.has_access_control_modifier = true;
        }
        if REENTRANCY_GUARD_PATTERNS.iter().any(|p| lowered.contains(p)) {
            features.has_reentrancy_guard = true;
        }
    }
}

fn count_calls(features: &mut FeatureVector, function: &FunctionFact) {
    for site in &function.call_sites {
        if site.is_external() {
            features.external_call_count = features.external_call_count.saturating_add(1);
        }
        // One physical call site counts once, however many paths match it.
        if delegatecall_paths(site).iter().any(|hit| *hit) {
            features.delegatecall_count = features.delegatecall_count.saturating_add(1);
        }
        if is_send_or_transfer(site) {
            features.send_transfer_count = features.send_transfer_count.saturating_add(1);
        }
    }
}

/// Internal-call name match, external member-name match, raw-text match.
fn delegatecall_paths(site: &CallSite) -> [bool; 3] {
    let (name, expression) = site.lowered();
    [
        site.kind == CalleeKind::Internal && name.contains("delegatecall"),
        site.is_external() && (site.kind == CalleeKind::DelegateCall || name.contains("delegatecall")),
        expression.is_some_and(|e| e.contains("delegatecall")),
    ]
}

fn is_send_or_transfer(site: &CallSite) -> bool {
    matches!(site.kind, CalleeKind::Send | CalleeKind::Transfer)
        || (site.is_external() && (site.name == "send" || site.name == "transfer"))
}

/// Checks-effects-interactions scan.
///
/// Writes and external calls are merged by control-flow position; the
/// "seen an external call" flag is never reset. A write sharing a position
/// with a call belongs to the same statement and is counted before it.
fn writes_around_first_external_call(function: &FunctionFact) -> (u64, u64) {
    let mut calls = function
        .call_sites
        .iter()
        .filter(|s| s.is_external())
        .map(|s| s.position)
        .peekable();

    let mut seen_external_call = false;
    let (mut before, mut after) = (0u64, 0u64);

    for write in &function.state_writes {
        while calls.next_if(|p| *p < write.position).is_some() {
            seen_external_call = true;
        }
        if seen_external_call {
            after += 1;
        } else {
            before += 1;
        }
    }

    (before, after)
}

fn scan_dangerous_constructs(features: &mut FeatureVector, function: &FunctionFact) {
    if function.special_var_reads.iter().any(|v| v.contains("tx.origin")) {
        features.uses_tx_origin = true;
    }

    for site in &function.call_sites {
        let (name, expression) = site.lowered();
        let text_has = |pattern: &str| {
            name.contains(pattern) || expression.as_deref().is_some_and(|e| e.contains(pattern))
        };

        if SELFDESTRUCT_PATTERNS.iter().any(|&p| text_has(p)) {
            features.has_selfdestruct = true;
        }

        let returns_status = matches!(
            site.kind,
            CalleeKind::LowLevelCall | CalleeKind::DelegateCall | CalleeKind::Send
        ) || text_has("call");
        if returns_status && !site.statement.checks_result() {
            features.unchecked_call_count = features.unchecked_call_count.saturating_add(1);
        }
    }
}
