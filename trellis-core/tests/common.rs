use trellis_core::Graph;

// Shared builders for the integration suites. Usage across test crates is
// per-file, hence the allow(dead_code).

/// Two-node graph carrying a single epsilon-labeled arc of the given weight.
#[allow(dead_code)]
pub fn scalar_graph(weight: f32) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 0, 0, weight).expect("scalar arc");
    g
}

/// Acceptor of a single symbol with the given weight.
#[allow(dead_code)]
pub fn symbol_graph(label: i32, weight: f32) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, label, label, weight).expect("symbol arc");
    g
}

/// Chain 0 -> 1 -> ... with one arc per weight, labels 1, 2, ...
#[allow(dead_code)]
pub fn linear_graph(weights: &[f32]) -> Graph {
    let g = Graph::new();
    g.add_node(true, weights.is_empty());
    for (i, &weight) in weights.iter().enumerate() {
        g.add_node(false, i + 1 == weights.len());
        g.add_arc(i, i + 1, (i + 1) as i32, (i + 1) as i32, weight)
            .expect("chain arc");
    }
    g
}
