use approx::AbsDiffEq;

use crate::graph::Graph;

/// Asserts that a scalar graph's value is within `tol` of `expected`.
pub fn check_scalar_near(g: &Graph, expected: f32, tol: f32) {
    let actual = g.item().expect("check_scalar_near: graph is not scalar");
    assert!(
        AbsDiffEq::abs_diff_eq(&actual, &expected, tol),
        "Scalar mismatch: expected {}, got {}. Difference: {}",
        expected,
        actual,
        (actual - expected).abs()
    );
}

/// Asserts that a graph's arc weights match `expected` element-wise within
/// `tol`.
pub fn check_weights_near(g: &Graph, expected: &[f32], tol: f32) {
    let actual = g.weights();
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arc count mismatch: expected {}, got {}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            AbsDiffEq::abs_diff_eq(a, e, tol),
            "Weight mismatch at arc {}: expected {}, got {}. Difference: {}",
            i,
            e,
            a,
            (a - e).abs()
        );
    }
}
