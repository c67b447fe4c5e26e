// src/graph/autograd_methods.rs
use std::sync::Arc;

use crate::autograd::graph::execute_backward;
use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;

impl Graph {
    /// Whether this graph participates in gradient computation.
    pub fn calc_grad(&self) -> bool {
        self.read_data().calc_grad
    }

    /// Enables or disables gradient participation.
    ///
    /// A graph with `calc_grad` disabled ignores gradient deposits and acts
    /// as a stop in backward traversal. Disabling also drops any gradient
    /// accumulated so far.
    pub fn set_calc_grad(&self, calc_grad: bool) {
        let mut guard = self.write_data();
        guard.calc_grad = calc_grad;
        if !calc_grad {
            guard.grad = None;
        }
    }

    /// The backward record attached by the operation that produced this
    /// graph, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp + Send + Sync>> {
        self.read_data().grad_fn.clone()
    }

    pub(crate) fn set_grad_fn(&self, grad_fn: Arc<dyn BackwardOp + Send + Sync>) {
        self.write_data().grad_fn = Some(grad_fn);
    }

    /// The accumulated gradient as a detached graph whose arc weights are
    /// the per-arc gradient values, or `None` if nothing has been deposited.
    pub fn grad(&self) -> Option<Graph> {
        let guard = self.read_data();
        let grad = guard.grad.as_ref()?;
        Some(Graph::from_data(guard.detached_with_weights(grad)))
    }

    /// Element-wise adds `values` into the gradient buffer, allocating it on
    /// the first deposit.
    ///
    /// Deposits on a graph with `calc_grad` disabled are silently ignored;
    /// a length mismatch is an error.
    pub fn add_grad(&self, values: Vec<f32>) -> Result<(), TrellisError> {
        let mut guard = self.write_data();
        if !guard.calc_grad {
            return Ok(());
        }
        if values.len() != guard.arcs.len() {
            return Err(TrellisError::invalid(
                "add_grad",
                format!(
                    "gradient length {} does not match arc count {}",
                    values.len(),
                    guard.arcs.len()
                ),
            ));
        }
        match guard.grad.as_mut() {
            Some(grad) => {
                for (g, v) in grad.iter_mut().zip(&values) {
                    *g += v;
                }
            }
            None => guard.grad = Some(values),
        }
        Ok(())
    }

    /// Shorthand deposit interpreting `other`'s arc weights as gradients.
    pub fn add_grad_graph(&self, other: &Graph) -> Result<(), TrellisError> {
        self.add_grad(other.weights())
    }

    /// Clears the accumulated gradient.
    pub fn zero_grad(&self) {
        self.write_data().grad = None;
    }

    /// A handle to the same arenas, detached from the autograd tape.
    pub fn detach(&self) -> Graph {
        let guard = self.read_data();
        let weights: Vec<f32> = guard.arcs.iter().map(|a| a.weight).collect();
        Graph::from_data(guard.detached_with_weights(&weights))
    }

    /// Runs the backward pass from this graph with an all-ones seed.
    ///
    /// Gradients accumulate into every participating graph reachable through
    /// the tape; repeated calls keep accumulating until [`zero_grad`].
    ///
    /// [`zero_grad`]: Graph::zero_grad
    pub fn backward(&self) -> Result<(), TrellisError> {
        execute_backward(self, None)
    }

    /// Runs the backward pass seeded with `seed`'s arc weights.
    ///
    /// `seed` must have the same arc count as this graph.
    pub fn backward_with_grad(&self, seed: &Graph) -> Result<(), TrellisError> {
        execute_backward(self, Some(seed))
    }
}
