// src/graph/mod.rs
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TrellisError;
use crate::graph_data::{ArcData, GraphData, NodeData};

pub mod accessors;
pub mod autograd_methods;
pub mod debug;

/// A weighted finite-state acceptor/transducer.
///
/// `Graph` is a cheap handle: cloning it shares the underlying node and arc
/// arenas, the gradient buffer and the autograd record. Structure is
/// append-only — operations never mutate a graph they received as input —
/// while arc weights may be overwritten in place (see
/// [`set_weight`](Graph::set_weight)) to support optimization loops.
pub struct Graph {
    pub(crate) data: Arc<RwLock<GraphData>>,
}

impl Graph {
    /// The reserved label marking an arc that consumes no symbol.
    ///
    /// Callers must not use this value as a regular alphabet symbol.
    pub const EPSILON: i32 = 0;

    /// Creates an empty graph with gradient computation enabled.
    pub fn new() -> Self {
        Graph {
            data: Arc::new(RwLock::new(GraphData::new())),
        }
    }

    pub(crate) fn from_data(data: GraphData) -> Self {
        Graph {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub(crate) fn read_data(&self) -> RwLockReadGuard<'_, GraphData> {
        self.data.read().expect("Graph RwLock poisoned")
    }

    pub(crate) fn write_data(&self) -> RwLockWriteGuard<'_, GraphData> {
        self.data.write().expect("Graph RwLock poisoned")
    }

    /// Appends a node and returns its index.
    pub fn add_node(&self, start: bool, accept: bool) -> usize {
        let mut guard = self.write_data();
        let id = guard.nodes.len();
        guard.nodes.push(NodeData {
            start,
            accept,
            in_arcs: Vec::new(),
            out_arcs: Vec::new(),
        });
        if start {
            guard.start_ids.push(id);
        }
        if accept {
            guard.accept_ids.push(id);
        }
        id
    }

    /// Appends an arc from `src` to `dst` and returns its index.
    ///
    /// Fails with [`TrellisError::InvalidGraph`] if either endpoint is out
    /// of range.
    pub fn add_arc(
        &self,
        src: usize,
        dst: usize,
        ilabel: i32,
        olabel: i32,
        weight: f32,
    ) -> Result<usize, TrellisError> {
        let mut guard = self.write_data();
        let num_nodes = guard.nodes.len();
        if src >= num_nodes || dst >= num_nodes {
            return Err(TrellisError::invalid(
                "add_arc",
                format!(
                    "endpoint ({src} -> {dst}) out of range for graph with {num_nodes} nodes"
                ),
            ));
        }
        let id = guard.arcs.len();
        guard.arcs.push(ArcData {
            src,
            dst,
            ilabel,
            olabel,
            weight,
        });
        guard.nodes[src].out_arcs.push(id);
        guard.nodes[dst].in_arcs.push(id);
        Ok(id)
    }

    /// Marks `node` as a start node. Idempotent.
    pub fn make_start(&self, node: usize) -> Result<(), TrellisError> {
        let mut guard = self.write_data();
        if node >= guard.nodes.len() {
            return Err(TrellisError::invalid(
                "make_start",
                format!("node {node} out of range"),
            ));
        }
        if !guard.nodes[node].start {
            guard.nodes[node].start = true;
            guard.start_ids.push(node);
        }
        Ok(())
    }

    /// Marks `node` as an accept node. Idempotent.
    pub fn make_accept(&self, node: usize) -> Result<(), TrellisError> {
        let mut guard = self.write_data();
        if node >= guard.nodes.len() {
            return Err(TrellisError::invalid(
                "make_accept",
                format!("node {node} out of range"),
            ));
        }
        if !guard.nodes[node].accept {
            guard.nodes[node].accept = true;
            guard.accept_ids.push(node);
        }
        Ok(())
    }

    /// Overwrites the weight of a single arc.
    pub fn set_weight(&self, arc: usize, weight: f32) -> Result<(), TrellisError> {
        let mut guard = self.write_data();
        let num_arcs = guard.arcs.len();
        match guard.arcs.get_mut(arc) {
            Some(a) => {
                a.weight = weight;
                Ok(())
            }
            None => Err(TrellisError::invalid(
                "set_weight",
                format!("arc {arc} out of range for graph with {num_arcs} arcs"),
            )),
        }
    }

    /// Overwrites all arc weights at once; `weights` must have one entry per
    /// arc.
    pub fn set_weights(&self, weights: &[f32]) -> Result<(), TrellisError> {
        let mut guard = self.write_data();
        if weights.len() != guard.arcs.len() {
            return Err(TrellisError::invalid(
                "set_weights",
                format!(
                    "got {} weights for graph with {} arcs",
                    weights.len(),
                    guard.arcs.len()
                ),
            ));
        }
        for (arc, &weight) in guard.arcs.iter_mut().zip(weights) {
            arc.weight = weight;
        }
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Clone for Graph {
    /// Clones the handle, not the arenas: both handles refer to one graph.
    fn clone(&self) -> Self {
        Graph {
            data: Arc::clone(&self.data),
        }
    }
}

/// Structural equality: same node count and flags, same arcs (endpoints,
/// labels, weights) in insertion order. Insertion order is part of the
/// observable contract, so two graphs accepting the same language with
/// reordered arcs compare unequal.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let a = self.read_data();
        let b = other.read_data();
        a.nodes.len() == b.nodes.len()
            && a.nodes
                .iter()
                .zip(&b.nodes)
                .all(|(x, y)| x.start == y.start && x.accept == y.accept)
            && a.arcs == b.arcs
    }
}
