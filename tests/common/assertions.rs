//! Assertion utilities for testing.
//!
//! Floating-point comparisons for scales, extents and projected
//! coordinates.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two slices are approximately element-wise equal.
pub fn assert_slice_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Slices have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= eps,
            "Slices differ at index {}: actual = {}, expected = {}, epsilon = {}",
            i,
            a,
            e,
            eps
        );
    }
}

/// Boundaries must start at cmin, end at cmax and be evenly spaced.
pub fn assert_even_boundaries(boundaries: &[f64], cmin: f64, cmax: f64, clev: u32) {
    assert_eq!(boundaries.len(), clev as usize + 1);
    let step = (cmax - cmin) / clev as f64;
    let expected: Vec<f64> = (0..=clev).map(|i| cmin + i as f64 * step).collect();
    assert_slice_approx_eq(boundaries, &expected, Some(step.abs() * 1e-9));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_even_boundaries() {
        assert_even_boundaries(&[0.0, 0.5, 1.0], 0.0, 1.0, 2);
    }
}
