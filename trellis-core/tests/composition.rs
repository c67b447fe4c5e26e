use trellis_core::{clone, compose, forward, project_output, Graph};
use trellis_core::utils::testing::check_scalar_near;

mod common;

/// Transducer mapping one symbol to another along a single arc.
fn mapper(ilabel: i32, olabel: i32, weight: f32) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, ilabel, olabel, weight).unwrap();
    g
}

/// Identity transducer over the given alphabet: one looping state accepting
/// any sequence of the symbols unchanged.
fn identity(alphabet: &[i32]) -> Graph {
    let g = Graph::new();
    g.add_node(true, true);
    for &label in alphabet {
        g.add_arc(0, 0, label, label, 0.0).unwrap();
    }
    g
}

#[test]
fn chain_maps_end_to_end() {
    // a:b . b:c accepts a:c; gradients reach both arcs with weight 1.
    let a = mapper(1, 2, 0.0);
    let b = mapper(2, 3, 0.0);
    let out = compose(&a, &b).unwrap();
    assert_eq!(out.num_arcs(), 1);
    assert_eq!((out.ilabel(0), out.olabel(0)), (1, 3));
    assert_eq!(out.weight(0), 0.0);

    out.backward().unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert_eq!(b.grad().unwrap().weights(), vec![1.0]);
}

#[test]
fn identity_preserves_the_weighted_language() {
    // A two-symbol weighted sequence composed with the identity over its
    // output alphabet scores exactly like the original.
    let a = Graph::new();
    a.add_node(true, false);
    a.add_node(false, false);
    a.add_node(false, true);
    a.add_arc(0, 1, 1, 5, 0.25).unwrap();
    a.add_arc(1, 2, 2, 6, 0.75).unwrap();

    let id = identity(&[5, 6]);
    let composed = compose(&a, &id).unwrap();

    check_scalar_near(
        &forward(&composed).unwrap(),
        forward(&a).unwrap().item().unwrap(),
        1e-5,
    );
    // And the projected output labels survive unchanged.
    let projected = project_output(&composed).unwrap();
    assert_eq!((projected.ilabel(0), projected.ilabel(1)), (5, 6));
}

#[test]
fn associativity_up_to_scoring() {
    // (A . B) . C and A . (B . C) accept the same weighted language; node
    // numbering may differ, so compare forward scores and end labels.
    let a = mapper(1, 2, 0.1);
    let b = mapper(2, 3, 0.2);
    let c = mapper(3, 4, 0.4);

    let left = compose(&compose(&a, &b).unwrap(), &c).unwrap();
    let right = compose(&a, &compose(&b, &c).unwrap()).unwrap();

    assert_eq!(left.num_arcs(), right.num_arcs());
    for arc in 0..left.num_arcs() {
        assert_eq!(left.ilabel(arc), right.ilabel(arc));
        assert_eq!(left.olabel(arc), right.olabel(arc));
    }
    check_scalar_near(
        &forward(&left).unwrap(),
        forward(&right).unwrap().item().unwrap(),
        1e-5,
    );
}

#[test]
fn associativity_with_epsilon_arcs() {
    // B carries an input-epsilon detour; both association orders must keep
    // the same score.
    let a = mapper(1, 2, 0.1);
    let b = Graph::new();
    b.add_node(true, false);
    b.add_node(false, false);
    b.add_node(false, true);
    b.add_arc(0, 1, Graph::EPSILON, 7, 0.3).unwrap();
    b.add_arc(1, 2, 2, 3, 0.2).unwrap();
    let c = Graph::new();
    c.add_node(true, false);
    c.add_node(false, false);
    c.add_node(false, true);
    c.add_arc(0, 1, 7, 7, 0.0).unwrap();
    c.add_arc(1, 2, 3, 4, 0.4).unwrap();

    let left = compose(&compose(&a, &b).unwrap(), &c).unwrap();
    let right = compose(&a, &compose(&b, &c).unwrap()).unwrap();
    check_scalar_near(
        &forward(&left).unwrap(),
        forward(&right).unwrap().item().unwrap(),
        1e-5,
    );
}

#[test]
fn gradient_flows_through_composed_scoring() {
    // d forward(compose(a, b)) / d weight = 1 for every participating arc
    // along the single path.
    let a = mapper(1, 2, 0.25);
    let b = mapper(2, 3, 0.5);
    let score = forward(&compose(&a, &b).unwrap()).unwrap();
    check_scalar_near(&score, 0.75, 1e-6);

    score.backward().unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert_eq!(b.grad().unwrap().weights(), vec![1.0]);
}

#[test]
fn multi_path_composition_splits_gradient_mass() {
    // Two parallel mappings with equal weight share the softmax mass.
    let a = Graph::new();
    a.add_node(true, false);
    a.add_node(false, true);
    a.add_arc(0, 1, 1, 2, 0.0).unwrap();
    a.add_arc(0, 1, 1, 3, 0.0).unwrap();
    let b = identity(&[2, 3]);

    let composed = compose(&a, &b).unwrap();
    assert_eq!(composed.num_arcs(), 2);
    let score = forward(&composed).unwrap();
    score.backward().unwrap();

    let grads = a.grad().unwrap().weights();
    assert!((grads[0] - 0.5).abs() < 1e-5);
    assert!((grads[1] - 0.5).abs() < 1e-5);
}

#[test]
fn composing_with_clone_of_self_keeps_acceptor() {
    // An acceptor composed with its own clone is itself (same structure),
    // a cheap sanity check on the pruning passes.
    let a = common::symbol_graph(3, 0.5);
    let composed = compose(&a, &clone(&a).unwrap()).unwrap();
    assert_eq!(composed.num_arcs(), 1);
    assert_eq!((composed.ilabel(0), composed.olabel(0)), (3, 3));
    assert_eq!(composed.weight(0), 1.0);
}
