// src/graph/accessors.rs
use crate::error::TrellisError;
use crate::graph::Graph;

impl Graph {
    /// Number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.read_data().nodes.len()
    }

    /// Number of arcs in the graph.
    pub fn num_arcs(&self) -> usize {
        self.read_data().arcs.len()
    }

    /// Whether `node` carries the start flag.
    pub fn is_start(&self, node: usize) -> bool {
        self.read_data().nodes[node].start
    }

    /// Whether `node` carries the accept flag.
    pub fn is_accept(&self, node: usize) -> bool {
        self.read_data().nodes[node].accept
    }

    /// Start node ids in the order their flag was set.
    pub fn starts(&self) -> Vec<usize> {
        self.read_data().start_ids.clone()
    }

    /// Accept node ids in the order their flag was set.
    pub fn accepts(&self) -> Vec<usize> {
        self.read_data().accept_ids.clone()
    }

    /// Source node of `arc`.
    pub fn src_node(&self, arc: usize) -> usize {
        self.read_data().arcs[arc].src
    }

    /// Destination node of `arc`.
    pub fn dst_node(&self, arc: usize) -> usize {
        self.read_data().arcs[arc].dst
    }

    /// Input label of `arc`.
    pub fn ilabel(&self, arc: usize) -> i32 {
        self.read_data().arcs[arc].ilabel
    }

    /// Output label of `arc`.
    pub fn olabel(&self, arc: usize) -> i32 {
        self.read_data().arcs[arc].olabel
    }

    /// Weight of `arc`.
    pub fn weight(&self, arc: usize) -> f32 {
        self.read_data().arcs[arc].weight
    }

    /// All arc weights in insertion order.
    pub fn weights(&self) -> Vec<f32> {
        self.read_data().arcs.iter().map(|a| a.weight).collect()
    }

    /// Indices of arcs entering `node`, in insertion order.
    pub fn in_arcs(&self, node: usize) -> Vec<usize> {
        self.read_data().nodes[node].in_arcs.clone()
    }

    /// Indices of arcs leaving `node`, in insertion order.
    pub fn out_arcs(&self, node: usize) -> Vec<usize> {
        self.read_data().nodes[node].out_arcs.clone()
    }

    /// In-degree of `node`.
    pub fn num_in(&self, node: usize) -> usize {
        self.read_data().nodes[node].in_arcs.len()
    }

    /// Out-degree of `node`.
    pub fn num_out(&self, node: usize) -> usize {
        self.read_data().nodes[node].out_arcs.len()
    }

    /// Extracts the weight of a graph holding exactly one arc.
    ///
    /// Scalar graphs are how pointwise results (e.g. `forward` scores)
    /// travel through the tape; anything else is an error.
    pub fn item(&self) -> Result<f32, TrellisError> {
        let guard = self.read_data();
        if guard.arcs.len() != 1 {
            return Err(TrellisError::invalid(
                "item",
                format!("expected exactly one arc, got {}", guard.arcs.len()),
            ));
        }
        Ok(guard.arcs[0].weight)
    }
}
