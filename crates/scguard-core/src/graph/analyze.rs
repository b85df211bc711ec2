//! Call graph construction and cycle/depth analysis.
//!
//! Responsibilities:
//! - One node per qualified function id of every concrete contract; overloads
//!   share a node
//! - One edge per resolved call target, with placeholder nodes for targets
//!   outside the analyzed set
//! - Maximum call depth, cycle membership and external-call weight in cycles
//!
//! Depth is a cycle-truncating approximation: when a traversal re-enters a
//! node already on its own stack, that branch contributes nothing. Results
//! are memoized per node, so the value reported for a node may depend on the
//! stack it was first reached from. Exact longest-simple-path is NP-hard and
//! is not attempted.
//!
//! The analyzer caches the graph and the depth memo. One instance must not be
//! shared across threads without external locking.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::error::CallGraphError;
use crate::facts::model::{CalleeKind, ContractFact, FunctionFact, FunctionRef};
use crate::graph::model::{CallGraph, CallGraphMetrics, CallGraphNode};

pub struct CallGraphAnalyzer<'a> {
    contracts: &'a [ContractFact],
    graph: Option<CallGraph>,
    depth_memo: HashMap<String, u64>,
}

impl<'a> CallGraphAnalyzer<'a> {
    pub fn new(contracts: &'a [ContractFact]) -> Self {
        Self {
            contracts,
            graph: None,
            depth_memo: HashMap::new(),
        }
    }

    /// Builds the graph on first use and returns the cached one afterwards.
    pub fn build(&mut self) -> Result<&CallGraph, CallGraphError> {
        let graph = self.take_or_construct()?;
        Ok(&*self.graph.insert(graph))
    }

    pub fn analyze(&mut self) -> Result<CallGraphMetrics, CallGraphError> {
        let graph = self.take_or_construct()?;

        let max_call_depth = max_call_depth(&graph, &mut self.depth_memo);
        let cycles = find_cycles(&graph);

        let functions_in_cycles: BTreeSet<String> = cycles.iter().flatten().cloned().collect();
        // Each node counts once, however many cycles it closes.
        let external_calls_in_cycles = functions_in_cycles
            .iter()
            .map(|id| graph.external_call_weight(id))
            .fold(0u64, u64::saturating_add);

        let metrics = CallGraphMetrics {
            has_cycles: !cycles.is_empty(),
            cycle_count: cycles.len() as u64,
            max_call_depth,
            functions_in_cycles,
            external_calls_in_cycles,
        };

        debug!(
            cycles = metrics.cycle_count,
            max_call_depth = metrics.max_call_depth,
            external_calls_in_cycles = metrics.external_calls_in_cycles,
            "call graph analyzed"
        );

        self.graph = Some(graph);
        Ok(metrics)
    }

    fn take_or_construct(&mut self) -> Result<CallGraph, CallGraphError> {
        match self.graph.take() {
            Some(graph) => Ok(graph),
            None => {
                let graph = construct(self.contracts)?;
                debug!(
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "call graph built"
                );
                Ok(graph)
            }
        }
    }
}

fn construct(contracts: &[ContractFact]) -> Result<CallGraph, CallGraphError> {
    let mut graph = CallGraph::default();

    let mut merged = 0usize;

    // Declared functions first, so a later declaration never collides with a
    // placeholder synthesized for an earlier call. Overloads share a qualified
    // id and collapse into one node carrying their combined weight.
    for contract in contracts.iter().filter(|c| c.is_concrete()) {
        for function in &contract.functions {
            let id = FunctionRef::new(&contract.id, &function.id).qualified();
            let weight = external_call_weight(function);
            match graph.nodes.get_mut(&id) {
                Some(node) => {
                    node.external_call_weight = node.external_call_weight.saturating_add(weight);
                    merged += 1;
                }
                None => {
                    graph.nodes.insert(
                        id,
                        CallGraphNode {
                            external_call_weight: weight,
                            placeholder: false,
                        },
                    );
                }
            }
        }
    }

    for contract in contracts.iter().filter(|c| c.is_concrete()) {
        for function in &contract.functions {
            let caller = FunctionRef::new(&contract.id, &function.id).qualified();
            for target in function.call_sites.iter().filter_map(|s| s.target.as_ref()) {
                if target.function.is_empty() {
                    return Err(CallGraphError::EmptyCallTarget { caller });
                }
                graph.add_edge(&caller, target.qualified());
            }
        }
    }

    if merged > 0 {
        debug!(merged, "overloaded functions merged into shared nodes");
    }

    Ok(graph)
}

fn external_call_weight(function: &FunctionFact) -> u64 {
    function
        .call_sites
        .iter()
        .filter(|site| {
            site.is_external()
                || (site.kind == CalleeKind::Internal && site.name.to_lowercase().contains("call"))
        })
        .count() as u64
}

struct DepthFrame<'g> {
    node: &'g str,
    successors: Vec<&'g str>,
    next: usize,
    best: u64,
}

impl<'g> DepthFrame<'g> {
    fn new(graph: &'g CallGraph, node: &'g str) -> Self {
        Self {
            node,
            successors: graph.successors(node),
            next: 0,
            best: 0,
        }
    }
}

fn max_call_depth(graph: &CallGraph, memo: &mut HashMap<String, u64>) -> u64 {
    graph
        .nodes
        .keys()
        .map(|root| depth_from(graph, root, memo))
        .max()
        .unwrap_or(0)
}

fn depth_from<'g>(graph: &'g CallGraph, root: &'g str, memo: &mut HashMap<String, u64>) -> u64 {
    if let Some(&depth) = memo.get(root) {
        return depth;
    }

    let mut visiting: HashSet<&'g str> = HashSet::from([root]);
    let mut stack = vec![DepthFrame::new(graph, root)];

    while let Some(top) = stack.last_mut() {
        if let Some(&succ) = top.successors.get(top.next) {
            top.next += 1;
            if let Some(&depth) = memo.get(succ) {
                top.best = top.best.max(depth.saturating_add(1));
            } else if !visiting.contains(succ) {
                visiting.insert(succ);
                stack.push(DepthFrame::new(graph, succ));
            }
            // A successor still on the stack closes a cycle; the branch is truncated.
            continue;
        }

        let Some(done) = stack.pop() else { break };
        visiting.remove(done.node);
        memo.insert(done.node.to_string(), done.best);

        match stack.last_mut() {
            Some(parent) => parent.best = parent.best.max(done.best.saturating_add(1)),
            None => return done.best,
        }
    }

    0
}

struct CycleFrame<'g> {
    successors: Vec<&'g str>,
    next: usize,
}

/// Every back edge to a node on the DFS stack closes one cycle, recorded as
/// the stack slice from that node to the top.
fn find_cycles(graph: &CallGraph) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for root in graph.nodes.keys() {
        if visited.contains(root.as_str()) {
            continue;
        }

        let mut path: Vec<&str> = vec![root.as_str()];
        let mut on_stack: HashSet<&str> = HashSet::from([root.as_str()]);
        let mut frames = vec![CycleFrame {
            successors: graph.successors(root),
            next: 0,
        }];
        visited.insert(root.as_str());

        while let Some(frame) = frames.last_mut() {
            let Some(&succ) = frame.successors.get(frame.next) else {
                frames.pop();
                if let Some(done) = path.pop() {
                    on_stack.remove(done);
                }
                continue;
            };
            frame.next += 1;

            if !visited.contains(succ) {
                visited.insert(succ);
                on_stack.insert(succ);
                path.push(succ);
                frames.push(CycleFrame {
                    successors: graph.successors(succ),
                    next: 0,
                });
            } else if on_stack.contains(succ) {
                if let Some(start) = path.iter().position(|n| *n == succ) {
                    cycles.push(path[start..].iter().map(|n| n.to_string()).collect());
                }
            }
        }
    }

    cycles
}
