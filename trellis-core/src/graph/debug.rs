// src/graph/debug.rs
use std::fmt;

use crate::graph::Graph;

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Graph")
            .field("nodes", &guard.nodes.len())
            .field("arcs", &guard.arcs.len())
            .field("starts", &guard.start_ids)
            .field("accepts", &guard.accept_ids)
            .field("calc_grad", &guard.calc_grad)
            .finish()
    }
}

/// Arc-per-line textual form for debugging. Not a serialization format.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        writeln!(f, "starts: {:?}", guard.start_ids)?;
        writeln!(f, "accepts: {:?}", guard.accept_ids)?;
        for arc in &guard.arcs {
            writeln!(
                f,
                "{} -> {} [{}:{}/{}]",
                arc.src, arc.dst, arc.ilabel, arc.olabel, arc.weight
            )?;
        }
        Ok(())
    }
}
