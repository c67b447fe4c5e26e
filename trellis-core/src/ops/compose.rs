// src/ops/compose.rs
//
// Weighted composition: the product construction intersecting the output
// labels of one transducer with the input labels of another, summing arc
// weights. Two passes over the product state space: a reverse reachability
// sweep from the accept pairs prunes everything that cannot reach
// acceptance, then a forward BFS from the start pairs builds only the
// surviving product states and arcs.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::graph_data::GraphData;

/// Which input arc(s) produced an output arc. Epsilon moves advance only
/// one side, leaving the other entry empty.
type Provenance = (Option<usize>, Option<usize>);

#[inline]
fn product_index(n1: usize, n2: usize, first_nodes: usize) -> usize {
    n1 + first_nodes * n2
}

/// Marks every product state that can reach an accept pair, walking arcs
/// backwards from all (accept, accept) seeds.
///
/// At each state, matched label pairs are expanded first. Lone epsilon
/// moves on either side are expanded only when no epsilon participated in
/// a match at this state: that guard is the canonical epsilon-traversal
/// rule, preventing the two consumption orders of a symmetric epsilon pair
/// from both being enumerated. The forward construction pass deliberately
/// does not share this guard; both passes must keep their exact shape for
/// the output arc set to stay stable.
fn find_reachable(first: &GraphData, second: &GraphData) -> Vec<bool> {
    let first_nodes = first.num_nodes();
    let mut reachable = vec![false; first_nodes * second.num_nodes()];
    let mut to_explore = VecDeque::new();
    for &fa in &first.accept_ids {
        for &sa in &second.accept_ids {
            to_explore.push_back((fa, sa));
            reachable[product_index(fa, sa, first_nodes)] = true;
        }
    }

    while let Some((x, y)) = to_explore.pop_front() {
        let mut epsilon_matched = false;
        for &i in &first.nodes[x].in_arcs {
            for &j in &second.nodes[y].in_arcs {
                if first.arcs[i].olabel != second.arcs[j].ilabel {
                    continue;
                }
                epsilon_matched |= first.arcs[i].olabel == Graph::EPSILON;
                let up = (first.arcs[i].src, second.arcs[j].src);
                let idx = product_index(up.0, up.1, first_nodes);
                if !reachable[idx] {
                    to_explore.push_back(up);
                }
                reachable[idx] = true;
            }
        }
        if !epsilon_matched {
            for &i in &first.nodes[x].in_arcs {
                if first.arcs[i].olabel != Graph::EPSILON {
                    continue;
                }
                let up = (first.arcs[i].src, y);
                let idx = product_index(up.0, up.1, first_nodes);
                if !reachable[idx] {
                    to_explore.push_back(up);
                }
                reachable[idx] = true;
            }
            for &j in &second.nodes[y].in_arcs {
                if second.arcs[j].ilabel != Graph::EPSILON {
                    continue;
                }
                let up = (x, second.arcs[j].src);
                let idx = product_index(up.0, up.1, first_nodes);
                if !reachable[idx] {
                    to_explore.push_back(up);
                }
                reachable[idx] = true;
            }
        }
    }
    reachable
}

/// Fetches the product node for `(dx, dy)`, creating it (and scheduling its
/// expansion) on first sight.
fn product_node(
    out: &Graph,
    first: &GraphData,
    second: &GraphData,
    dx: usize,
    dy: usize,
    new_nodes: &mut [Option<usize>],
    to_explore: &mut VecDeque<(usize, usize)>,
) -> usize {
    let idx = product_index(dx, dy, first.num_nodes());
    *new_nodes[idx].get_or_insert_with(|| {
        to_explore.push_back((dx, dy));
        out.add_node(
            first.nodes[dx].start && second.nodes[dy].start,
            first.nodes[dx].accept && second.nodes[dy].accept,
        )
    })
}

/// Backward context for [`compose`]: every output arc remembers which input
/// arc(s) it came from, so the deltas scatter-add straight into each side's
/// gradient, gated per side by `calc_grad`. Provenance also disambiguates
/// output arcs that share endpoints and labels but were produced by
/// different input pairs.
#[derive(Debug)]
struct ComposeBackward {
    first: Graph,
    second: Graph,
    grad_info: Vec<Provenance>,
}

impl BackwardOp for ComposeBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        if deltas.num_arcs() != self.grad_info.len() {
            return Err(TrellisError::ShapeMismatch {
                operation: "compose backward".to_string(),
                expected: self.grad_info.len(),
                actual: deltas.num_arcs(),
            });
        }
        let mut grad_first = self
            .first
            .calc_grad()
            .then(|| vec![0.0f32; self.first.num_arcs()]);
        let mut grad_second = self
            .second
            .calc_grad()
            .then(|| vec![0.0f32; self.second.num_arcs()]);

        let weights = deltas.weights();
        for (k, &(i, j)) in self.grad_info.iter().enumerate() {
            let delta = weights[k];
            if let (Some(grad), Some(i)) = (grad_first.as_mut(), i) {
                grad[i] += delta;
            }
            if let (Some(grad), Some(j)) = (grad_second.as_mut(), j) {
                grad[j] += delta;
            }
        }
        Ok(vec![grad_first, grad_second])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.first.clone(), self.second.clone()]
    }
}

/// Composes two transducers: the result reads `first`'s input labels,
/// emits `second`'s output labels, and weighs each path by the sum of the
/// matched paths' weights.
///
/// An output-epsilon arc in `first` advances only the first side; an
/// input-epsilon arc in `second` advances only the second side. Product
/// states that cannot reach a joint accept state are pruned before any
/// node or arc is built.
///
/// Output arc order is deterministic: states are expanded in BFS order,
/// and at each state the matched pairs come first (outer loop over
/// `first`'s arcs), then `first`'s output-epsilons, then `second`'s
/// input-epsilons.
pub fn compose(first: &Graph, second: &Graph) -> Result<Graph, TrellisError> {
    let out = Graph::new();
    let mut grad_info: Vec<Provenance> = Vec::new();
    {
        let a = first.read_data();
        let b = second.read_data();
        log::debug!(
            "composing over a {}x{} product state space",
            a.num_nodes(),
            b.num_nodes()
        );
        let reachable = find_reachable(&a, &b);

        let mut new_nodes: Vec<Option<usize>> = vec![None; a.num_nodes() * b.num_nodes()];
        let mut to_explore = VecDeque::new();
        for &s1 in &a.start_ids {
            for &s2 in &b.start_ids {
                let idx = product_index(s1, s2, a.num_nodes());
                if reachable[idx] {
                    new_nodes[idx] = Some(out.add_node(
                        true,
                        a.nodes[s1].accept && b.nodes[s2].accept,
                    ));
                    to_explore.push_back((s1, s2));
                }
            }
        }

        while let Some((x, y)) = to_explore.pop_front() {
            let curr = new_nodes[product_index(x, y, a.num_nodes())].ok_or_else(|| {
                TrellisError::Internal("compose: explored an unbuilt product state".to_string())
            })?;

            // Matched label pairs advance both sides.
            for &i in &a.nodes[x].out_arcs {
                for &j in &b.nodes[y].out_arcs {
                    if a.arcs[i].olabel != b.arcs[j].ilabel {
                        continue;
                    }
                    let (dx, dy) = (a.arcs[i].dst, b.arcs[j].dst);
                    if !reachable[product_index(dx, dy, a.num_nodes())] {
                        continue;
                    }
                    let dst = product_node(&out, &a, &b, dx, dy, &mut new_nodes, &mut to_explore);
                    out.add_arc(
                        curr,
                        dst,
                        a.arcs[i].ilabel,
                        b.arcs[j].olabel,
                        a.arcs[i].weight + b.arcs[j].weight,
                    )?;
                    grad_info.push((Some(i), Some(j)));
                }
            }
            // Output epsilons in the first graph advance only that side.
            for &i in &a.nodes[x].out_arcs {
                if a.arcs[i].olabel != Graph::EPSILON {
                    continue;
                }
                let (dx, dy) = (a.arcs[i].dst, y);
                if !reachable[product_index(dx, dy, a.num_nodes())] {
                    continue;
                }
                let dst = product_node(&out, &a, &b, dx, dy, &mut new_nodes, &mut to_explore);
                out.add_arc(curr, dst, a.arcs[i].ilabel, Graph::EPSILON, a.arcs[i].weight)?;
                grad_info.push((Some(i), None));
            }
            // Input epsilons in the second graph advance only that side.
            for &j in &b.nodes[y].out_arcs {
                if b.arcs[j].ilabel != Graph::EPSILON {
                    continue;
                }
                let (dx, dy) = (x, b.arcs[j].dst);
                if !reachable[product_index(dx, dy, a.num_nodes())] {
                    continue;
                }
                let dst = product_node(&out, &a, &b, dx, dy, &mut new_nodes, &mut to_explore);
                out.add_arc(curr, dst, Graph::EPSILON, b.arcs[j].olabel, b.arcs[j].weight)?;
                grad_info.push((None, Some(j)));
            }
        }
    }

    if first.calc_grad() || second.calc_grad() {
        out.set_grad_fn(Arc::new(ComposeBackward {
            first: first.clone(),
            second: second.clone(),
            grad_info,
        }));
    } else {
        out.set_calc_grad(false);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "compose_test.rs"]
mod tests;
