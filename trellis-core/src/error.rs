use thiserror::Error;

/// Error type shared by every fallible operation in the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrellisError {
    #[error("Invalid graph in {operation}: {reason}")]
    InvalidGraph { operation: String, reason: String },

    #[error("Graph has a cycle, self-loop or is disconnected from its start nodes")]
    CyclicGraph,

    #[error("Arc count mismatch in {operation}: expected {expected}, got {actual}")]
    ShapeMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cycle detected in the autograd graph during the backward pass")]
    CycleDetected,

    #[error("backward() called on a graph with gradient computation disabled")]
    CalcGradNotMet,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrellisError {
    /// Shorthand for the common `InvalidGraph` construction.
    pub(crate) fn invalid(operation: &str, reason: impl Into<String>) -> Self {
        TrellisError::InvalidGraph {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}
