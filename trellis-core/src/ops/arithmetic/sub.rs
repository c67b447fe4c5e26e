// src/ops/arithmetic/sub.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::TrellisError;
use crate::graph::Graph;
use crate::ops::arithmetic::{scalar_delta, scalar_result};

/// Backward context for [`subtract`]: the delta flows unchanged to the left
/// operand and negated to the right.
#[derive(Debug)]
struct SubBackward {
    lhs: Graph,
    rhs: Graph,
}

impl BackwardOp for SubBackward {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError> {
        let delta = scalar_delta(deltas, "subtract backward")?;
        Ok(vec![Some(vec![delta]), Some(vec![-delta])])
    }

    fn inputs(&self) -> Vec<Graph> {
        vec![self.lhs.clone(), self.rhs.clone()]
    }
}

/// Subtracts two scalar graphs: the result's single arc weighs
/// `lhs.item() - rhs.item()`.
pub fn subtract(lhs: &Graph, rhs: &Graph) -> Result<Graph, TrellisError> {
    let weight = lhs.item()? - rhs.item()?;
    let result = scalar_result(weight)?;
    if lhs.calc_grad() || rhs.calc_grad() {
        result.set_grad_fn(Arc::new(SubBackward {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        }));
    } else {
        result.set_calc_grad(false);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
