//! Differentiable weighted finite-state transducers.
//!
//! Graphs encode weighted automata; operations (`compose`, `forward`,
//! `closure`, …) build new graphs while recording, on an autograd tape,
//! how to push gradient from an output's arc weights back to the arc
//! weights of its inputs.

pub mod autograd;
pub mod error;
pub mod graph;
pub mod graph_data;
pub mod ops;
pub mod utils;

pub use error::TrellisError;
pub use graph::Graph;
pub use ops::{
    add, clone, closure, compose, forward, negate, project, project_input, project_output,
    remove, remove_labels, subtract, sum, Projection,
};
