use serde::{Deserialize, Serialize};

use crate::layers::neuron::Neuron;

/// An ordered group of neurons that all read the same input vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    /// `size` random neurons, each reading `incoming` values.
    pub fn new(size: usize, incoming: usize) -> Layer {
        let neurons = (0..size).map(|_| Neuron::new(incoming)).collect();
        Layer { neurons }
    }

    pub fn from_neurons(neurons: Vec<Neuron>) -> Layer {
        Layer { neurons }
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    /// Arity of the first neuron; all neurons of a valid layer agree.
    pub fn incoming(&self) -> usize {
        self.neurons.first().map(Neuron::incoming).unwrap_or(0)
    }

    pub fn calculate_output(&self, inputs: &[f64]) -> Vec<f64> {
        self.neurons.iter().map(|n| n.calculate_output(inputs)).collect()
    }
}
