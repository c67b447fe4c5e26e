// src/ops/structural/union.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;

/// Backward context for [`sum`]: the output's arcs partition into
/// contiguous ranges aligned with each input's arcs.
#[derive(Debug)]
struct SumBackward {
    inputs: Vec<Graph>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        let total: usize = self.inputs.iter().map(Graph::num_arcs).sum();
        if deltas.num_arcs() != total {
            return Err(TrellisError::ShapeMismatch {
                operation: "sum backward".to_string(),
                expected: total,
                actual: deltas.num_arcs(),
            });
        }
        let weights = deltas.weights();
        let mut grads = Vec::with_capacity(self.inputs.len());
        let mut offset = 0;
        for input in &self.inputs {
            let num_arcs = input.num_arcs();
            if input.calc_grad() {
                grads.push(Some(weights[offset..offset + num_arcs].to_vec()));
            } else {
                grads.push(None);
            }
            offset += num_arcs;
        }
        Ok(grads)
    }

    fn inputs(&self) -> Vec<Graph> {
        self.inputs.clone()
    }
}

/// Union of the given graphs: node and arc arenas are concatenated in list
/// order with endpoints shifted by the cumulative node offsets, preserving
/// all start and accept flags. The result accepts anything some input
/// accepts. `sum(&[])` is the empty graph.
pub fn sum(graphs: &[Graph]) -> Result<Graph, TrellisError> {
    let out = Graph::new();
    let mut node_offset = 0;
    for g in graphs {
        let src = g.read_data();
        for node in &src.nodes {
            out.add_node(node.start, node.accept);
        }
        for arc in &src.arcs {
            out.add_arc(
                node_offset + arc.src,
                node_offset + arc.dst,
                arc.ilabel,
                arc.olabel,
                arc.weight,
            )?;
        }
        node_offset += src.nodes.len();
    }
    if graphs.iter().any(Graph::calc_grad) {
        out.set_grad_fn(Arc::new(SumBackward {
            inputs: graphs.to_vec(),
        }));
    } else {
        out.set_calc_grad(false);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "union_test.rs"]
mod tests;
