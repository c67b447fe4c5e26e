use super::*;
use crate::ops::structural::clone::clone;

fn acceptor(label: i32, weight: f32) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, label, label, weight).unwrap();
    g
}

#[test]
fn concatenates_arenas_with_offsets() {
    let a = acceptor(1, 0.5);
    let b = acceptor(2, 1.5);
    let u = sum(&[a.clone(), b.clone()]).unwrap();

    assert_eq!(u.num_nodes(), 4);
    assert_eq!(u.num_arcs(), 2);
    assert_eq!(u.starts(), vec![0, 2]);
    assert_eq!(u.accepts(), vec![1, 3]);
    assert_eq!((u.src_node(1), u.dst_node(1)), (2, 3));
    assert_eq!(u.weight(1), 1.5);
}

#[test]
fn singleton_sum_equals_clone() {
    let a = acceptor(1, 0.5);
    assert_eq!(sum(&[a.clone()]).unwrap(), clone(&a).unwrap());
}

#[test]
fn empty_sum_is_empty_graph() {
    let u = sum(&[]).unwrap();
    assert_eq!(u.num_nodes(), 0);
    assert_eq!(u.num_arcs(), 0);
}

#[test]
fn backward_slices_ranges_per_input() {
    let a = acceptor(1, 0.5);
    let b = acceptor(2, 1.5);
    let c = acceptor(3, 2.5);
    b.set_calc_grad(false);
    let u = sum(&[a.clone(), b.clone(), c.clone()]).unwrap();

    let seed = clone(&u).unwrap();
    seed.set_weights(&[10.0, 20.0, 30.0]).unwrap();
    u.backward_with_grad(&seed).unwrap();

    assert_eq!(a.grad().unwrap().weights(), vec![10.0]);
    assert!(b.grad().is_none());
    assert_eq!(c.grad().unwrap().weights(), vec![30.0]);
}
