use super::*;
use crate::utils::testing::check_scalar_near;

fn scalar(weight: f32) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 0, 0, weight).unwrap();
    g
}

#[test]
fn adds_two_scalars() {
    let a = scalar(3.0);
    let b = scalar(4.0);
    let out = add(&a, &b).unwrap();
    check_scalar_near(&out, 7.0, 1e-6);
}

#[test]
fn backward_sends_delta_to_both() {
    let a = scalar(3.0);
    let b = scalar(4.0);
    let out = add(&a, &b).unwrap();
    out.backward().unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert_eq!(b.grad().unwrap().weights(), vec![1.0]);
}

#[test]
fn respects_calc_grad_gate() {
    let a = scalar(3.0);
    let b = scalar(4.0);
    b.set_calc_grad(false);
    let out = add(&a, &b).unwrap();
    out.backward().unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert!(b.grad().is_none());
}

#[test]
fn same_graph_on_both_sides_accumulates() {
    let a = scalar(1.5);
    let out = add(&a, &a).unwrap();
    check_scalar_near(&out, 3.0, 1e-6);
    out.backward().unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![2.0]);
}
