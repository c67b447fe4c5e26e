// src/autograd/grad_check.rs
//
// Finite-difference validation of analytic gradients.

use thiserror::Error;

use crate::error::TrellisError;
use crate::graph::Graph;

/// Failures specific to gradient checking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error(
        "gradient mismatch for input {input_index}, arc {arc_index}: \
         analytic {analytic} vs numeric {numeric} (difference {difference})"
    )]
    GradientMismatch {
        input_index: usize,
        arc_index: usize,
        analytic: f32,
        numeric: f32,
        difference: f32,
    },

    #[error("forward function failed during gradient check: {0}")]
    ForwardPass(TrellisError),

    #[error("backward pass failed during gradient check: {0}")]
    BackwardPass(TrellisError),

    #[error("input {input_index} participates in gradients but received none")]
    MissingGrad { input_index: usize },

    #[error("numeric gradient is not finite for input {input_index}, arc {arc_index}")]
    NonFiniteNumeric { input_index: usize, arc_index: usize },

    #[error("graph error during gradient check: {0}")]
    Graph(#[from] TrellisError),
}

/// Checks the analytic gradients of `func` against central finite
/// differences.
///
/// `func` must map the inputs to a *scalar* graph (one arc); the loss is its
/// `item()`. For every arc weight of every participating input, the weight
/// is perturbed by ±`epsilon`, the loss re-evaluated, and the resulting
/// numeric derivative compared against the gradient left by a backward pass
/// with the default all-ones seed.
///
/// Inputs are restored to their original weights before returning, also on
/// the error paths that arise after the first perturbation.
pub fn check_grad<F>(
    func: F,
    inputs: &[Graph],
    epsilon: f32,
    tolerance: f32,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Graph]) -> Result<Graph, TrellisError>,
{
    for input in inputs {
        input.zero_grad();
    }
    let output = func(inputs).map_err(GradCheckError::ForwardPass)?;
    output.backward().map_err(GradCheckError::BackwardPass)?;

    let analytic_grads: Vec<Option<Graph>> = inputs.iter().map(Graph::grad).collect();

    for (input_index, input) in inputs.iter().enumerate() {
        if !input.calc_grad() {
            continue;
        }
        let analytic = analytic_grads[input_index]
            .as_ref()
            .ok_or(GradCheckError::MissingGrad { input_index })?
            .weights();
        let original = input.weights();

        for arc_index in 0..input.num_arcs() {
            let eval_at = |weight: f32| -> Result<f32, GradCheckError> {
                input.set_weight(arc_index, weight)?;
                let out = func(inputs).map_err(GradCheckError::ForwardPass);
                input.set_weight(arc_index, original[arc_index])?;
                Ok(out?.item()?)
            };
            let loss_plus = eval_at(original[arc_index] + epsilon)?;
            let loss_minus = eval_at(original[arc_index] - epsilon)?;
            let numeric = (loss_plus - loss_minus) / (2.0 * epsilon);
            if !numeric.is_finite() {
                return Err(GradCheckError::NonFiniteNumeric {
                    input_index,
                    arc_index,
                });
            }

            let difference = (analytic[arc_index] - numeric).abs();
            if difference > tolerance {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    arc_index,
                    analytic: analytic[arc_index],
                    numeric,
                    difference,
                });
            }
        }
    }
    Ok(())
}
