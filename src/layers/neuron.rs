use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{activation::activation::ActivationFunction, loss::squared::SquaredError};

/// Every neuron in a network uses the same activation.
pub const ACTIVATION: ActivationFunction = ActivationFunction::Sigmoid;

/// A single unit: one weight per incoming value, a bias, and scratch slots
/// for the gradient estimated during `Network::learn`.
///
/// Only `weights` and `bias` are persisted; the gradient slots are rebuilt
/// empty (zeroed, sized to the weights) when a neuron is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredNeuron")]
pub struct Neuron {
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(skip)]
    pub grad_weights: Vec<f64>,
    #[serde(skip)]
    pub grad_bias: f64,
}

#[derive(Deserialize)]
struct StoredNeuron {
    weights: Vec<f64>,
    bias: f64,
}

impl From<StoredNeuron> for Neuron {
    fn from(stored: StoredNeuron) -> Self {
        Neuron::with_params(stored.weights, stored.bias)
    }
}

impl Neuron {
    /// Random weights in [-1, 1], bias 0.
    pub fn new(incoming: usize) -> Neuron {
        let mut rng = rand::thread_rng();
        let weights = (0..incoming).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Neuron::with_params(weights, 0.0)
    }

    pub fn with_params(weights: Vec<f64>, bias: f64) -> Neuron {
        let grad_weights = vec![0.0; weights.len()];
        Neuron { weights, bias, grad_weights, grad_bias: 0.0 }
    }

    /// Number of incoming connections.
    pub fn incoming(&self) -> usize {
        self.weights.len()
    }

    /// sigmoid(x·w + b). The caller guarantees `inputs.len() == self.incoming()`.
    pub fn calculate_output(&self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len(), self.weights.len());
        let weighted: f64 = inputs.iter().zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        ACTIVATION.function(weighted + self.bias)
    }

    pub fn loss(&self, output: f64, expected: f64) -> f64 {
        SquaredError::loss(output, expected)
    }

    /// One gradient-descent step using the stored gradient estimates.
    pub fn apply_gradients(&mut self, learn_rate: f64) {
        for (w, g) in self.weights.iter_mut().zip(self.grad_weights.iter()) {
            *w -= g * learn_rate;
        }
        self.bias -= self.grad_bias * learn_rate;
    }

    pub fn clear_gradients(&mut self) {
        self.grad_weights.iter_mut().for_each(|g| *g = 0.0);
        self.grad_bias = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_weights_stay_in_unit_range() {
        let neuron = Neuron::new(64);
        assert_eq!(neuron.incoming(), 64);
        assert_eq!(neuron.grad_weights.len(), 64);
        assert_eq!(neuron.bias, 0.0);
        assert!(neuron.weights.iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn output_is_sigmoid_of_weighted_sum() {
        let neuron = Neuron::with_params(vec![0.5, -1.0], 0.25);
        let expected = 1.0 / (1.0 + (-(2.0 * 0.5 - 1.0 * 1.0 + 0.25f64)).exp());
        assert!((neuron.calculate_output(&[2.0, 1.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn apply_gradients_descends() {
        let mut neuron = Neuron::with_params(vec![1.0, 2.0], 0.5);
        neuron.grad_weights = vec![0.5, -1.0];
        neuron.grad_bias = 2.0;
        neuron.apply_gradients(0.1);
        assert!((neuron.weights[0] - 0.95).abs() < 1e-12);
        assert!((neuron.weights[1] - 2.1).abs() < 1e-12);
        assert!((neuron.bias - 0.3).abs() < 1e-12);

        neuron.clear_gradients();
        assert_eq!(neuron.grad_weights, vec![0.0, 0.0]);
        assert_eq!(neuron.grad_bias, 0.0);
    }

    #[test]
    fn deserialized_neuron_gets_gradient_slots() {
        let neuron: Neuron =
            serde_json::from_str(r#"{"weights":[0.1,0.2,0.3],"bias":1.5,"note":"x"}"#).unwrap();
        assert_eq!(neuron.grad_weights.len(), 3);
        assert_eq!(neuron.bias, 1.5);
    }

    #[test]
    fn gradients_are_not_persisted() {
        let mut neuron = Neuron::with_params(vec![0.1], 0.0);
        neuron.grad_weights[0] = 7.0;
        let json = serde_json::to_string(&neuron).unwrap();
        assert!(!json.contains("grad"));
    }
}
