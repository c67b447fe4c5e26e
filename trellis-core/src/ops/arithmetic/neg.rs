// src/ops/arithmetic/neg.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::ops::arithmetic::{scalar_delta, scalar_result};

/// Backward context for [`negate`]: the delta flips sign on its way to the
/// input's single arc.
#[derive(Debug)]
struct NegBackward {
    input: Graph,
}

impl BackwardOp for NegBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        let delta = scalar_delta(deltas, "negate backward")?;
        Ok(vec![Some(vec![-delta])])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.input.clone()]
    }
}

/// Negates a scalar graph: the result's single arc weighs `-g.item()`.
pub fn negate(g: &Graph) -> Result<Graph, TrellisError> {
    let weight = -g.item()?;
    let result = scalar_result(weight)?;
    if g.calc_grad() {
        result.set_grad_fn(Arc::new(NegBackward { input: g.clone() }));
    } else {
        result.set_calc_grad(false);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "neg_test.rs"]
mod tests;
