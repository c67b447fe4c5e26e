use super::*;

#[test]
fn removes_epsilon_chain() {
    // 0 -a-> 1 -eps-> 2 -b-> 3
    let g = Graph::new();
    for _ in 0..4 {
        g.add_node(false, false);
    }
    g.make_start(0).unwrap();
    g.make_accept(3).unwrap();
    g.add_arc(0, 1, 1, 1, 0.3).unwrap();
    g.add_arc(1, 2, Graph::EPSILON, Graph::EPSILON, 0.7).unwrap();
    g.add_arc(2, 3, 2, 2, 0.9).unwrap();

    let r = remove(&g).unwrap();
    // Node 2 had only the epsilon arc coming in, so it is dropped.
    assert_eq!(r.num_nodes(), 3);
    assert_eq!(r.num_arcs(), 2);
    assert_eq!(r.starts(), vec![0]);
    assert_eq!(r.accepts(), vec![2]);
    // The b-arc is re-attached to the epsilon arc's surviving source.
    assert_eq!((r.src_node(1), r.dst_node(1)), (1, 2));
    assert_eq!(r.ilabel(1), 2);
    // Output is unweighted.
    assert_eq!(r.weights(), vec![0.0, 0.0]);
}

#[test]
fn acceptance_reached_through_removed_arcs_is_pulled_back() {
    // 0 -a-> 1 -eps-> 2(accept)
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 1, 1, 0.0).unwrap();
    g.add_arc(1, 2, Graph::EPSILON, Graph::EPSILON, 0.0).unwrap();

    let r = remove(&g).unwrap();
    assert_eq!(r.num_nodes(), 2);
    // Node 1 inherits the acceptance it reaches for free.
    assert!(r.is_accept(1));
    assert_eq!(r.num_arcs(), 1);
}

#[test]
fn removes_only_the_requested_label_pair() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 5, 6, 0.0).unwrap();
    g.add_arc(1, 2, 5, 5, 0.0).unwrap();

    let r = remove_labels(&g, 5, 6).unwrap();
    assert_eq!(r.num_arcs(), 1);
    assert_eq!((r.ilabel(0), r.olabel(0)), (5, 5));
    // The (5,5) arc departs from the kept source of the removed arc.
    assert_eq!((r.src_node(0), r.dst_node(0)), (0, 1));
}

#[test]
fn propagates_no_gradient() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 1, 1, 0.5).unwrap();

    let r = remove(&g).unwrap();
    assert!(r.grad_fn().is_some());
    r.backward().unwrap();
    assert!(g.grad().is_none());
}
