// src/graph_data.rs
use std::sync::Arc;

use crate::autograd::BackwardOp;

/// A state in the automaton. Adjacency is stored per node so traversals can
/// walk incoming and outgoing arcs without scanning the arc arena.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeData {
    pub(crate) start: bool,
    pub(crate) accept: bool,
    /// Indices of arcs with `dst == this node`, in insertion order.
    pub(crate) in_arcs: Vec<usize>,
    /// Indices of arcs with `src == this node`, in insertion order.
    pub(crate) out_arcs: Vec<usize>,
}

/// A labeled, weighted transition between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArcData {
    pub(crate) src: usize,
    pub(crate) dst: usize,
    pub(crate) ilabel: i32,
    pub(crate) olabel: i32,
    pub(crate) weight: f32,
}

/// Internal storage and autograd metadata for a [`Graph`](crate::Graph).
///
/// Wrapped in `Arc<RwLock<GraphData>>` by the `Graph` handle so several
/// handles (and backward records holding inputs) can share one arena.
/// Nodes and arcs are append-only; arc weights are the only field mutated
/// in place after construction.
#[derive(Debug, Default)]
pub struct GraphData {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) arcs: Vec<ArcData>,
    /// Start node ids in the order the flag was set.
    pub(crate) start_ids: Vec<usize>,
    /// Accept node ids in the order the flag was set.
    pub(crate) accept_ids: Vec<usize>,

    /// Gates gradient accumulation and backward traversal through this graph.
    pub(crate) calc_grad: bool,
    /// Per-arc gradient buffer, allocated on the first deposit.
    pub(crate) grad: Option<Vec<f32>>,
    /// Backward record linking this graph to the operation that produced it.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp + Send + Sync>>,
}

impl GraphData {
    pub(crate) fn new() -> Self {
        GraphData {
            calc_grad: true,
            ..Default::default()
        }
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Structural copy with the given arc weights, detached from the tape.
    ///
    /// Used to materialize gradient buffers as graphs (`deltas` for backward
    /// closures, the public `grad()` view).
    pub(crate) fn detached_with_weights(&self, weights: &[f32]) -> GraphData {
        debug_assert_eq!(weights.len(), self.arcs.len());
        let arcs = self
            .arcs
            .iter()
            .zip(weights)
            .map(|(arc, &weight)| ArcData { weight, ..arc.clone() })
            .collect();
        GraphData {
            nodes: self.nodes.clone(),
            arcs,
            start_ids: self.start_ids.clone(),
            accept_ids: self.accept_ids.clone(),
            calc_grad: false,
            grad: None,
            grad_fn: None,
        }
    }
}
