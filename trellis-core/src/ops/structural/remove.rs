// src/ops/structural/remove.rs
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::graph_data::ArcData;

/// Backward context for [`remove`]: the rebuilt graph is unweighted, so no
/// gradient flows back through it. The record still links the input so the
/// tape stays connected.
#[derive(Debug)]
struct RemoveBackward {
    input: Graph,
}

impl BackwardOp for RemoveBackward {
    fn backward(&self, _deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        Ok(vec![None])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.input.clone()]
    }
}

/// Removes epsilon arcs: shorthand for
/// `remove_labels(g, Graph::EPSILON, Graph::EPSILON)`.
pub fn remove(g: &Graph) -> Result<Graph, TrellisError> {
    remove_labels(g, Graph::EPSILON, Graph::EPSILON)
}

/// Eliminates every arc labeled exactly `(ilabel, olabel)`, producing an
/// unweighted copy (all arcs weigh 0) that accepts the same strings when
/// the input is a DAG over the removed arcs.
///
/// A node is kept iff it is a start node or has at least one incoming arc
/// that does not match. From each kept node, a search along matching arcs
/// collects the accept flags and the non-matching departures of everything
/// reachable for free, and re-attaches those departures to the kept node.
///
/// TODO: an accepting node whose incoming arcs all match is dropped here,
/// which can shrink the accepted language; a weighted variant accumulating
/// scores along the removed paths would subsume this case.
pub fn remove_labels(g: &Graph, ilabel: i32, olabel: i32) -> Result<Graph, TrellisError> {
    let out = Graph::new();
    {
        let src = g.read_data();
        let matches = |arc: &ArcData| arc.ilabel == ilabel && arc.olabel == olabel;

        let mut new_ids: Vec<Option<usize>> = vec![None; src.nodes.len()];
        for (n, node) in src.nodes.iter().enumerate() {
            let keep = node.start || !node.in_arcs.iter().all(|&a| matches(&src.arcs[a]));
            if keep {
                new_ids[n] = Some(out.add_node(node.start, false));
            }
        }

        let mut to_explore = VecDeque::new();
        let mut visited = HashSet::new();
        for n in 0..src.nodes.len() {
            let Some(curr) = new_ids[n] else { continue };
            to_explore.push_back(n);
            visited.insert(n);
            while let Some(next) = to_explore.pop_front() {
                if src.nodes[next].accept {
                    out.make_accept(curr)?;
                }
                for &a in &src.nodes[next].out_arcs {
                    let arc = &src.arcs[a];
                    if matches(arc) {
                        if visited.insert(arc.dst) {
                            to_explore.push_back(arc.dst);
                        }
                    } else {
                        let dst = new_ids[arc.dst].ok_or_else(|| {
                            TrellisError::Internal(
                                "remove: target of a surviving arc was not kept".to_string(),
                            )
                        })?;
                        out.add_arc(curr, dst, arc.ilabel, arc.olabel, 0.0)?;
                    }
                }
            }
            visited.clear();
        }
    }
    if g.calc_grad() {
        out.set_grad_fn(Arc::new(RemoveBackward { input: g.clone() }));
    } else {
        out.set_calc_grad(false);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "remove_test.rs"]
mod tests;
