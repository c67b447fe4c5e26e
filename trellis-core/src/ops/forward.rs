// src/ops/forward.rs
//
// Log-semiring path-sum over a DAG: the score of a graph is
// logsumexp over all accepting paths of the path's total arc weight.
// Scores propagate through a Kahn-style topological sweep; the gradient
// runs the same sweep in reverse with out-degrees as the countdown.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::ops::arithmetic::{scalar_delta, scalar_result};

const NEG_INF: f32 = f32::NEG_INFINITY;

/// Numerically stable `log(exp(a) + exp(b))`, with `-inf` as the identity.
pub(crate) fn log_add(a: f32, b: f32) -> f32 {
    if a == NEG_INF {
        return b;
    }
    if b == NEG_INF {
        return a;
    }
    a.max(b) + (-(a - b).abs()).exp().ln_1p()
}

/// Backward context for [`forward`]: keeps the node scores and the final
/// score from the forward sweep. Differentiating the logsumexp gives each
/// arc the gradient
/// `node_grad(dst) * exp(weight + score(src) - score(dst))`,
/// accumulated source-ward along the reversed topological order.
#[derive(Debug)]
struct ForwardBackward {
    input: Graph,
    scores: Vec<f32>,
    output: f32,
}

impl BackwardOp for ForwardBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        let delta = scalar_delta(deltas, "forward backward")?;
        let src = self.input.read_data();
        let mut degrees: Vec<usize> = src.nodes.iter().map(|n| n.out_arcs.len()).collect();
        let mut node_grads = vec![0.0f32; src.num_nodes()];
        let mut arc_grads = vec![0.0f32; src.num_arcs()];

        let mut queue = VecDeque::new();
        for &n in &src.accept_ids {
            // Unreachable accept nodes (score -inf) contribute nothing.
            if self.scores[n] != NEG_INF {
                node_grads[n] = delta * (self.scores[n] - self.output).exp();
            }
            if src.nodes[n].out_arcs.is_empty() {
                queue.push_back(n);
            }
        }

        while let Some(n) = queue.pop_front() {
            let score = self.scores[n];
            let grad_n = node_grads[n];
            for &a in &src.nodes[n].in_arcs {
                let arc = &src.arcs[a];
                let up = arc.src;
                let arc_grad = if score == NEG_INF || self.scores[up] == NEG_INF {
                    0.0
                } else {
                    grad_n * (arc.weight + self.scores[up] - score).exp()
                };
                arc_grads[a] = arc_grad;
                node_grads[up] += arc_grad;
                degrees[up] -= 1;
                if degrees[up] == 0 {
                    queue.push_back(up);
                }
            }
        }
        Ok(vec![Some(arc_grads)])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.input.clone()]
    }
}

/// Log-semiring forward score of a DAG, returned as a scalar graph.
///
/// Start nodes are seeded with score 0 and scores flow along arcs in
/// topological order, combining with [`log_add`]; the result is the
/// combination over all accept nodes. Nodes never reached from a start
/// keep score `-inf` and drop out of the sum.
///
/// Fails with [`TrellisError::CyclicGraph`] when an accept node retains
/// positive residual in-degree after the sweep — a cycle, a self-loop, or
/// an accept chain fed only by nodes the sweep never drained.
pub fn forward(g: &Graph) -> Result<Graph, TrellisError> {
    let (scores, score) = {
        let src = g.read_data();
        let mut scores = vec![NEG_INF; src.num_nodes()];
        let mut degrees: Vec<usize> = src.nodes.iter().map(|n| n.in_arcs.len()).collect();

        let mut queue = VecDeque::new();
        for &s in &src.start_ids {
            scores[s] = 0.0;
            if src.nodes[s].in_arcs.is_empty() {
                queue.push_back(s);
            }
        }

        while let Some(n) = queue.pop_front() {
            let score = scores[n];
            for &a in &src.nodes[n].out_arcs {
                let arc = &src.arcs[a];
                scores[arc.dst] = log_add(score + arc.weight, scores[arc.dst]);
                degrees[arc.dst] -= 1;
                if degrees[arc.dst] == 0 {
                    queue.push_back(arc.dst);
                }
            }
        }

        let mut score = NEG_INF;
        for &n in &src.accept_ids {
            if degrees[n] > 0 {
                return Err(TrellisError::CyclicGraph);
            }
            score = log_add(score, scores[n]);
        }
        (scores, score)
    };

    let result = scalar_result(score)?;
    if g.calc_grad() {
        result.set_grad_fn(Arc::new(ForwardBackward {
            input: g.clone(),
            scores,
            output: score,
        }));
    } else {
        result.set_calc_grad(false);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "forward_test.rs"]
mod tests;
