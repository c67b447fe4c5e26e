// src/autograd/backward_op.rs
use std::fmt::Debug;

use crate::error::TrellisError;
use crate::graph::Graph;

/// The backward capability of a differentiable graph operation.
///
/// Every operation that produces a graph from `calc_grad`-participating
/// inputs attaches an implementation of this trait to its output. During
/// [`backward`](crate::Graph::backward) the engine walks the tape in reverse
/// topological order and hands each record the gradient accumulated at its
/// output.
///
/// `deltas` is a detached graph with the same arc count as the operation's
/// output, whose arc weights carry the incoming gradient signal.
///
/// `backward` returns one gradient buffer per input, aligned with
/// [`inputs`](BackwardOp::inputs); `None` marks an input that receives no
/// gradient from this operation (either because it is gated by `calc_grad`
/// or because the operation does not propagate, like epsilon removal). The
/// engine accumulates each `Some` buffer into the corresponding input's
/// gradient via [`add_grad`](crate::Graph::add_grad).
///
/// Implementations must verify that `deltas` has the arc count they expect
/// and fail with [`TrellisError::ShapeMismatch`] otherwise.
///
/// The `Debug + Send + Sync` bounds allow the `Arc<dyn BackwardOp>` held by
/// the output graph to be shared and inspected across threads.
pub trait BackwardOp: Debug + Send + Sync {
    fn backward(&self, deltas: &Graph) -> Result<Vec<Option<Vec<f32>>>, TrellisError>;

    /// The graphs that participated in the forward operation, in the same
    /// order as the buffers returned by [`backward`](BackwardOp::backward).
    ///
    /// Holding full handles (rather than identifiers) keeps every input
    /// alive for as long as the output's tape record exists, which is what
    /// makes the backward traversal safe.
    fn inputs(&self) -> Vec<Graph>;
}
