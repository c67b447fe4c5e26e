// src/ops/structural/clone.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;

/// Label rewriting applied by [`project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Keep `(ilabel, olabel)` as they are.
    None,
    /// Emit `(ilabel, ilabel)`: the graph viewed as an acceptor of its
    /// input alphabet.
    Input,
    /// Emit `(olabel, olabel)`: the graph viewed as an acceptor of its
    /// output alphabet.
    Output,
}

/// Backward context for [`project`]: arcs correspond positionally, so the
/// deltas pass through untouched.
#[derive(Debug)]
struct ProjectBackward {
    input: Graph,
}

impl BackwardOp for ProjectBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        if deltas.num_arcs() != self.input.num_arcs() {
            return Err(TrellisError::ShapeMismatch {
                operation: "project backward".to_string(),
                expected: self.input.num_arcs(),
                actual: deltas.num_arcs(),
            });
        }
        Ok(vec![Some(deltas.weights())])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.input.clone()]
    }
}

/// Structural copy of `g` with labels rewritten per `projection`.
///
/// Node and arc order are preserved, so the copy's arcs correspond
/// one-to-one with the original's.
pub fn project(g: &Graph, projection: Projection) -> Result<Graph, TrellisError> {
    let out = Graph::new();
    {
        let src = g.read_data();
        for node in &src.nodes {
            out.add_node(node.start, node.accept);
        }
        for arc in &src.arcs {
            let (ilabel, olabel) = match projection {
                Projection::None => (arc.ilabel, arc.olabel),
                Projection::Input => (arc.ilabel, arc.ilabel),
                Projection::Output => (arc.olabel, arc.olabel),
            };
            out.add_arc(arc.src, arc.dst, ilabel, olabel, arc.weight)?;
        }
    }
    if g.calc_grad() {
        out.set_grad_fn(Arc::new(ProjectBackward { input: g.clone() }));
    } else {
        out.set_calc_grad(false);
    }
    Ok(out)
}

/// Structural copy of `g` with labels untouched.
pub fn clone(g: &Graph) -> Result<Graph, TrellisError> {
    project(g, Projection::None)
}

/// Copy of `g` as an acceptor over its input labels.
pub fn project_input(g: &Graph) -> Result<Graph, TrellisError> {
    project(g, Projection::Input)
}

/// Copy of `g` as an acceptor over its output labels.
pub fn project_output(g: &Graph) -> Result<Graph, TrellisError> {
    project(g, Projection::Output)
}

#[cfg(test)]
#[path = "clone_test.rs"]
mod tests;
