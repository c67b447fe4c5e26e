// src/ops/arithmetic/add.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::ops::arithmetic::{scalar_delta, scalar_result};

/// Backward context for [`add`]: the delta flows to both operands unchanged.
#[derive(Debug)]
struct AddBackward {
    lhs: Graph,
    rhs: Graph,
}

impl BackwardOp for AddBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        let delta = scalar_delta(deltas, "add backward")?;
        Ok(vec![Some(vec![delta]), Some(vec![delta])])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.lhs.clone(), self.rhs.clone()]
    }
}

/// Adds two scalar graphs: the result's single arc weighs
/// `lhs.item() + rhs.item()`.
pub fn add(lhs: &Graph, rhs: &Graph) -> Result<Graph, TrellisError> {
    let weight = lhs.item()? + rhs.item()?;
    let result = scalar_result(weight)?;
    if lhs.calc_grad() || rhs.calc_grad() {
        result.set_grad_fn(Arc::new(AddBackward {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        }));
    } else {
        result.set_calc_grad(false);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
