//! Pointwise algebra over scalar graphs (graphs holding exactly one arc).

pub mod add;
pub mod neg;
pub mod sub;

pub use add::add;
pub use neg::negate;
pub use sub::subtract;

use crate::error::TrellisError;
use crate::graph::Graph;

/// Builds the canonical scalar result: node 0 start, node 1 accept, one
/// epsilon-labeled arc carrying `weight`.
pub(crate) fn scalar_result(weight: f32) -> Result<Graph, TrellisError> {
    let result = Graph::new();
    result.add_node(true, false);
    result.add_node(false, true);
    result.add_arc(0, 1, 0, 0, weight)?;
    Ok(result)
}

/// Extracts the single delta of a scalar operation's incoming gradient,
/// insisting on the one-arc shape the output was built with.
pub(crate) fn scalar_delta(deltas: &Graph, operation: &str) -> Result<f32, TrellisError> {
    if deltas.num_arcs() != 1 {
        return Err(TrellisError::ShapeMismatch {
            operation: operation.to_string(),
            expected: 1,
            actual: deltas.num_arcs(),
        });
    }
    deltas.item()
}
