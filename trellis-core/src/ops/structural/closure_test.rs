use super::*;
use crate::ops::structural::clone::clone;

fn single_symbol() -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 7, 7, 0.5).unwrap();
    g
}

#[test]
fn star_structure() {
    let g = single_symbol();
    let star = closure(&g).unwrap();

    // New node 0 is both start and accept; former start lost its flag.
    assert_eq!(star.num_nodes(), 3);
    assert!(star.is_start(0) && star.is_accept(0));
    assert!(!star.is_start(1));
    assert!(star.is_accept(2));

    // Copied arc first, then 0 -> former start, then former accept -> former
    // start.
    assert_eq!(star.num_arcs(), 3);
    assert_eq!((star.src_node(0), star.dst_node(0)), (1, 2));
    assert_eq!(star.weight(0), 0.5);
    assert_eq!((star.src_node(1), star.dst_node(1)), (0, 1));
    assert_eq!(star.ilabel(1), Graph::EPSILON);
    assert_eq!((star.src_node(2), star.dst_node(2)), (2, 1));
    assert_eq!(star.weight(2), 0.0);
}

#[test]
fn star_of_multi_start_graph_wires_every_pair() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 2, 1, 1, 0.0).unwrap();
    g.add_arc(1, 2, 2, 2, 0.0).unwrap();
    let star = closure(&g).unwrap();
    // 2 copied + per start: one entry arc and one arc per accept.
    assert_eq!(star.num_arcs(), 2 + 2 * (1 + 1));
}

#[test]
fn backward_maps_prefix_arcs_only() {
    let g = single_symbol();
    let star = closure(&g).unwrap();
    let seed = clone(&star).unwrap();
    seed.set_weights(&[2.0, 5.0, 9.0]).unwrap();
    star.backward_with_grad(&seed).unwrap();
    // Only the copied arc's delta reaches the input.
    assert_eq!(g.grad().unwrap().weights(), vec![2.0]);
}
