/// Squared error, the per-output loss of every network in this crate.
pub struct SquaredError;

impl SquaredError {
    /// Scalar loss for one output: (output - expected)²
    pub fn loss(output: f64, expected: f64) -> f64 {
        let error = output - expected;
        error * error
    }

    /// Summed loss over an output vector, index-aligned with `expected`.
    pub fn total(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(&p, &e)| SquaredError::loss(p, e))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::SquaredError;

    #[test]
    fn loss_is_zero_only_on_exact_match() {
        assert_eq!(SquaredError::loss(0.25, 0.25), 0.0);
        assert!(SquaredError::loss(0.25, 0.2500001) > 0.0);
    }

    #[test]
    fn larger_errors_grow_super_linearly() {
        let small = SquaredError::loss(0.1, 0.0);
        let large = SquaredError::loss(0.2, 0.0);
        assert!(large > 2.0 * small);
    }

    #[test]
    fn total_sums_per_output() {
        let total = SquaredError::total(&[1.0, 0.5], &[0.0, 0.0]);
        assert!((total - 1.25).abs() < 1e-12);
    }
}
