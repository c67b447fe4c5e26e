// src/ops/structural/closure.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;

/// Backward context for [`closure`]: the first `input.num_arcs()` output
/// arcs are the copied ones, in the original order; the epsilon arcs added
/// after them carry no gradient back.
#[derive(Debug)]
struct ClosureBackward {
    input: Graph,
    num_output_arcs: usize,
}

impl BackwardOp for ClosureBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        if deltas.num_arcs() != self.num_output_arcs {
            return Err(TrellisError::ShapeMismatch {
                operation: "closure backward".to_string(),
                expected: self.num_output_arcs,
                actual: deltas.num_arcs(),
            });
        }
        let mut weights = deltas.weights();
        weights.truncate(self.input.num_arcs());
        Ok(vec![Some(weights)])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.input.clone()]
    }
}

/// Kleene star of `g`.
///
/// A fresh node 0 that is both start and accept is prepended; `g`'s nodes
/// follow shifted by one, keeping their accept flags but losing their start
/// status. `g`'s arcs are copied first (their order is what the gradient
/// correspondence relies on), then epsilon arcs wire node 0 to every former
/// start and every former accept back to every former start.
pub fn closure(g: &Graph) -> Result<Graph, TrellisError> {
    let out = Graph::new();
    {
        let src = g.read_data();
        out.add_node(true, true);
        for node in &src.nodes {
            out.add_node(false, node.accept);
        }
        for arc in &src.arcs {
            out.add_arc(arc.src + 1, arc.dst + 1, arc.ilabel, arc.olabel, arc.weight)?;
        }
        for &s in &src.start_ids {
            out.add_arc(0, s + 1, Graph::EPSILON, Graph::EPSILON, 0.0)?;
            for &a in &src.accept_ids {
                out.add_arc(a + 1, s + 1, Graph::EPSILON, Graph::EPSILON, 0.0)?;
            }
        }
    }
    if g.calc_grad() {
        let num_output_arcs = out.num_arcs();
        out.set_grad_fn(Arc::new(ClosureBackward {
            input: g.clone(),
            num_output_arcs,
        }));
    } else {
        out.set_calc_grad(false);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "closure_test.rs"]
mod tests;
