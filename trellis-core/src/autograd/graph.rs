// src/autograd/graph.rs
//
// Traversal of the computation DAG implicitly defined by graphs and their
// backward records, and the engine that drives a backward pass over it.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::error::TrellisError;
use crate::graph::Graph;
use crate::graph_data::GraphData;

/// Stable identity of a graph in the computation DAG.
///
/// The pointer to the shared arena is used purely as a key: handles may be
/// cloned and dropped freely, but all handles to one graph share one arena.
/// The backward records keep the arenas alive (their `inputs()` hold full
/// handles), so these keys never dangle while a traversal is running.
pub type NodeId = *const RwLock<GraphData>;

pub(crate) fn node_id(graph: &Graph) -> NodeId {
    Arc::as_ptr(&graph.data)
}

/// Collects the autograd DAG rooted at `root` in reverse topological order
/// (inputs before the graphs computed from them).
///
/// Post-order DFS over `grad_fn.inputs()`. Graphs with `calc_grad` disabled
/// are stops: they are recorded but not expanded, so nothing behind them is
/// visited. A cycle — impossible for tapes built through this crate's
/// operations, since every output is newer than its inputs — is reported as
/// [`TrellisError::CycleDetected`] rather than hanging the traversal.
pub fn topological_sort(root: &Graph) -> Result<Vec<Graph>, TrellisError> {
    fn dfs(
        node: &Graph,
        visited: &mut HashSet<NodeId>,
        on_path: &mut HashSet<NodeId>,
        sorted: &mut Vec<Graph>,
    ) -> Result<(), TrellisError> {
        let id = node_id(node);
        if visited.contains(&id) {
            return Ok(());
        }
        if on_path.contains(&id) {
            return Err(TrellisError::CycleDetected);
        }
        on_path.insert(id);

        if node.calc_grad() {
            if let Some(grad_fn) = node.grad_fn() {
                for parent in grad_fn.inputs() {
                    dfs(&parent, visited, on_path, sorted)?;
                }
            }
        }

        on_path.remove(&id);
        visited.insert(id);
        sorted.push(node.clone());
        Ok(())
    }

    let mut sorted = Vec::new();
    let mut visited = HashSet::new();
    let mut on_path = HashSet::new();
    dfs(root, &mut visited, &mut on_path, &mut sorted)?;
    Ok(sorted)
}

/// Drives a full backward pass from `output`.
///
/// Seeds the output's gradient buffer (all ones when `seed` is `None`),
/// sorts the tape, then walks it output-first. Each graph's accumulated
/// gradient is complete by the time its own record runs, because every
/// consumer of that graph sits later in the reverse order.
pub(crate) fn execute_backward(
    output: &Graph,
    seed: Option<&Graph>,
) -> Result<(), TrellisError> {
    if !output.calc_grad() {
        return Err(TrellisError::CalcGradNotMet);
    }
    match seed {
        Some(seed) => {
            if seed.num_arcs() != output.num_arcs() {
                return Err(TrellisError::ShapeMismatch {
                    operation: "backward".to_string(),
                    expected: output.num_arcs(),
                    actual: seed.num_arcs(),
                });
            }
            output.add_grad(seed.weights())?;
        }
        None => output.add_grad(vec![1.0; output.num_arcs()])?,
    }

    let order = topological_sort(output)?;
    log::debug!("backward pass over {} tape nodes", order.len());

    for graph in order.iter().rev() {
        let Some(grad_fn) = graph.grad_fn() else {
            continue;
        };
        let inputs = grad_fn.inputs();
        if !inputs.iter().any(Graph::calc_grad) {
            continue;
        }
        let Some(deltas) = graph.grad() else {
            // No gradient reached this graph (all of its consumers dropped
            // their signal), so there is nothing to propagate.
            log::debug!("skipping a tape node that accumulated no gradient");
            continue;
        };
        let grads = grad_fn.backward(&deltas)?;
        if grads.len() != inputs.len() {
            return Err(TrellisError::Internal(format!(
                "backward record returned {} gradients for {} inputs",
                grads.len(),
                inputs.len()
            )));
        }
        for (input, grad) in inputs.iter().zip(grads) {
            if let Some(values) = grad {
                input.add_grad(values)?;
            }
        }
    }
    Ok(())
}
