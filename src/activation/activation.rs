use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Scalar transform applied to a neuron's weighted sum.
///
/// The set is closed; every network built by this crate uses `Sigmoid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Linear,
    Heaviside,
    Sigmoid,
    ReLU,
    Tanh,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => x,
            ActivationFunction::Heaviside => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Tanh => x.tanh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ActivationFunction::*;

    #[test]
    fn sigmoid_is_half_at_zero() {
        assert_eq!(Sigmoid.function(0.0), 0.5);
        assert!(Sigmoid.function(10.0) > 0.99);
        assert!(Sigmoid.function(-10.0) < 0.01);
    }

    #[test]
    fn heaviside_is_strict() {
        assert_eq!(Heaviside.function(0.0), 0.0);
        assert_eq!(Heaviside.function(1e-9), 1.0);
    }

    #[test]
    fn piecewise_functions() {
        assert_eq!(Linear.function(-3.5), -3.5);
        assert_eq!(ReLU.function(-2.0), 0.0);
        assert_eq!(ReLU.function(2.0), 2.0);
        assert!((Tanh.function(0.5) - 0.5f64.tanh()).abs() < 1e-15);
    }
}
