use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Directed function-call graph over qualified ids (`Contract.function`).
///
/// Ordered maps keep every traversal, and therefore every metric,
/// independent of hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    pub nodes: BTreeMap<String, CallGraphNode>,
    pub edges: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphNode {
    /// External-call expressions plus internal calls named like `call`.
    pub external_call_weight: u64,
    /// Synthesized for a call target outside the analyzed functions.
    pub placeholder: bool,
}

impl CallGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn calls(&self, caller: &str, callee: &str) -> bool {
        self.edges
            .get(caller)
            .is_some_and(|callees| callees.contains(callee))
    }

    /// Successors of `id` in canonical order.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.edges
            .get(id)
            .map(|callees| callees.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn external_call_weight(&self, id: &str) -> u64 {
        self.nodes
            .get(id)
            .map(|n| n.external_call_weight)
            .unwrap_or(0)
    }

    pub(crate) fn add_edge(&mut self, caller: &str, callee: String) {
        if !self.nodes.contains_key(&callee) {
            self.nodes.insert(
                callee.clone(),
                CallGraphNode {
                    external_call_weight: 0,
                    placeholder: true,
                },
            );
        }
        self.edges.entry(caller.to_string()).or_default().insert(callee);
    }
}

/// Graph-derived reentrancy indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphMetrics {
    pub has_cycles: bool,
    /// Closed cycles found by the DFS; not deduplicated against each other.
    pub cycle_count: u64,
    pub max_call_depth: u64,
    pub functions_in_cycles: BTreeSet<String>,
    /// Sum of `external_call_weight` over `functions_in_cycles`.
    pub external_calls_in_cycles: u64,
}

impl CallGraphMetrics {
    /// A cycle co-occurring with an external call. Necessary, not sufficient,
    /// for reentrancy.
    pub fn has_cycle_with_external_call(&self) -> bool {
        self.has_cycles && self.external_calls_in_cycles > 0
    }
}
