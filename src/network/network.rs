use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::loss::squared::SquaredError;
use crate::network::params::{ParamId, ParamSlot};
use crate::train::gradient::{self, Gradients};

/// A feed-forward network of sigmoid neurons.
///
/// `inputs` is the arity of the raw input vector; `layers` holds every layer
/// that has neurons, so `layers[0]` reads the raw inputs and the last layer
/// produces the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub(crate) inputs: usize,
    pub(crate) layers: Vec<Layer>,
}

impl Network {
    /// Builds a randomly initialized network. `sizes[0]` is the input arity,
    /// every further entry the neuron count of one layer.
    pub fn from_layer_sizes(sizes: &[usize]) -> Result<Network> {
        if sizes.len() < 2 {
            return Err(Error::InvalidTopology(format!(
                "need an input size and at least one layer size, got {} sizes",
                sizes.len()
            )));
        }
        if let Some(i) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidTopology(format!("layer {} has size 0", i)));
        }

        let layers = sizes.windows(2)
            .map(|pair| Layer::new(pair[1], pair[0]))
            .collect();
        Ok(Network { inputs: sizes[0], layers })
    }

    /// Wraps hand-built layers, checking that their arities chain up.
    pub fn from_layers(inputs: usize, layers: Vec<Layer>) -> Result<Network> {
        let network = Network { inputs, layers };
        network.validate()?;
        Ok(network)
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::size).unwrap_or(0)
    }

    /// Input arity followed by every layer's neuron count, the same shape
    /// `from_layer_sizes` accepts.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.inputs)
            .chain(self.layers.iter().map(Layer::size))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::InvalidTopology("network has no layers".into()));
        }
        let mut incoming = self.inputs;
        for (l, layer) in self.layers.iter().enumerate() {
            if layer.neurons.is_empty() {
                return Err(Error::InvalidTopology(format!("layer {} has no neurons", l)));
            }
            if let Some(n) = layer.neurons.iter().position(|n| n.incoming() != incoming) {
                return Err(Error::InvalidTopology(format!(
                    "layer {} neuron {} has {} weights, expected {}",
                    l, n, layer.neurons[n].incoming(), incoming
                )));
            }
            incoming = layer.size();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Writes the network as pretty-printed JSON, replacing any existing file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a network written by `save_json`. Unknown keys are ignored.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(text: &str) -> Result<Network> {
        let network: Network = serde_json::from_str(text)?;
        network.validate()?;
        Ok(network)
    }

    // -----------------------------------------------------------------------
    // Inference & evaluation
    // -----------------------------------------------------------------------

    /// Feeds `inputs` through every layer and returns the last layer's output.
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.inputs {
            return Err(Error::SizeMismatch { expected: self.inputs, actual: inputs.len() });
        }
        let mut current = inputs.to_vec();
        for layer in &self.layers {
            current = layer.calculate_output(&current);
        }
        Ok(current)
    }

    /// Summed squared error of one prediction against `expected`.
    pub fn cost(&self, inputs: &[f64], expected: &[f64]) -> Result<f64> {
        let outputs = self.predict(inputs)?;
        if expected.len() != outputs.len() {
            return Err(Error::SizeMismatch { expected: outputs.len(), actual: expected.len() });
        }
        Ok(SquaredError::total(&outputs, expected))
    }

    /// Mean `cost` over `data`. An empty dataset is an error, not zero.
    pub fn average_cost(&self, data: &[TrainingData]) -> Result<f64> {
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let mut total = 0.0;
        for sample in data {
            total += self.cost(&sample.inputs, &sample.outputs)?;
        }
        Ok(total / data.len() as f64)
    }

    /// Number of samples whose predicted argmax matches the expected argmax.
    pub fn test(&self, data: &[TrainingData]) -> Result<usize> {
        let mut correct = 0;
        for sample in data {
            let predicted = self.predict(&sample.inputs)?;
            if argmax(&predicted) == argmax(&sample.outputs) {
                correct += 1;
            }
        }
        Ok(correct)
    }

    /// Divides each dimension of `input` by the matching entry of `max`.
    pub fn normalize(input: &[f64], max: &[f64]) -> Result<Vec<f64>> {
        if input.len() != max.len() {
            return Err(Error::SizeMismatch { expected: max.len(), actual: input.len() });
        }
        Ok(input.iter().zip(max.iter()).map(|(x, m)| x / m).collect())
    }

    /// `normalize` applied to the inputs of every sample; outputs are kept.
    pub fn normalize_set(data: &[TrainingData], max: &[f64]) -> Result<Vec<TrainingData>> {
        data.iter()
            .map(|sample| {
                let inputs = Network::normalize(&sample.inputs, max)?;
                Ok(TrainingData::new(inputs, sample.outputs.clone()))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    /// Every trainable parameter, layer by layer, neuron by neuron, weights
    /// before the bias.
    pub fn param_ids(&self) -> Vec<ParamId> {
        let mut ids = Vec::with_capacity(self.parameter_count());
        for (l, layer) in self.layers.iter().enumerate() {
            for (n, neuron) in layer.neurons.iter().enumerate() {
                ids.extend((0..neuron.incoming()).map(|i| ParamId::weight(l, n, i)));
                ids.push(ParamId::bias(l, n));
            }
        }
        ids
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter()
            .flat_map(|layer| layer.neurons.iter())
            .map(|neuron| neuron.incoming() + 1)
            .sum()
    }

    pub fn param(&self, id: ParamId) -> Result<f64> {
        let neuron = self.layers.get(id.layer)
            .and_then(|layer| layer.neurons.get(id.neuron))
            .ok_or(Error::ParamOutOfRange(id))?;
        match id.slot {
            ParamSlot::Weight(i) => neuron.weights.get(i).copied().ok_or(Error::ParamOutOfRange(id)),
            ParamSlot::Bias => Ok(neuron.bias),
        }
    }

    /// Overwrites one parameter in place (interactive tuning).
    pub fn set_param(&mut self, id: ParamId, value: f64) -> Result<()> {
        let neuron = self.layers.get_mut(id.layer)
            .and_then(|layer| layer.neurons.get_mut(id.neuron))
            .ok_or(Error::ParamOutOfRange(id))?;
        match id.slot {
            ParamSlot::Weight(i) => {
                let w = neuron.weights.get_mut(i).ok_or(Error::ParamOutOfRange(id))?;
                *w = value;
            }
            ParamSlot::Bias => neuron.bias = value,
        }
        Ok(())
    }

    pub fn weight(&self, layer: usize, neuron: usize, index: usize) -> Result<f64> {
        self.param(ParamId::weight(layer, neuron, index))
    }

    pub fn set_weight(&mut self, layer: usize, neuron: usize, index: usize, value: f64) -> Result<()> {
        self.set_param(ParamId::weight(layer, neuron, index), value)
    }

    pub fn bias(&self, layer: usize, neuron: usize) -> Result<f64> {
        self.param(ParamId::bias(layer, neuron))
    }

    pub fn set_bias(&mut self, layer: usize, neuron: usize, value: f64) -> Result<()> {
        self.set_param(ParamId::bias(layer, neuron), value)
    }

    // -----------------------------------------------------------------------
    // Training
    // -----------------------------------------------------------------------

    /// One descent step with finite-difference gradients.
    ///
    /// Every parameter is probed against the same baseline cost on a private
    /// copy of the network; only once all probes have finished are the
    /// estimates stored and applied. If the dataset is empty or misshapen the
    /// network is left untouched.
    pub fn learn(&mut self, data: &[TrainingData], learn_rate: f64) -> Result<()> {
        let gradients = gradient::estimate_gradients(self, data)?;
        debug!(
            "estimated {} gradients against baseline cost {:.6}",
            self.parameter_count(),
            gradients.baseline
        );
        self.store_gradients(&gradients);
        self.apply_gradients(learn_rate);
        Ok(())
    }

    /// Copies estimates into each neuron's gradient slots.
    pub fn store_gradients(&mut self, gradients: &Gradients) {
        for (layer, grads) in self.layers.iter_mut().zip(gradients.layers.iter()) {
            for (neuron, grad) in layer.neurons.iter_mut().zip(grads.iter()) {
                neuron.grad_weights.clone_from(&grad.weights);
                neuron.grad_bias = grad.bias;
            }
        }
    }

    /// Applies the stored gradients to every neuron, then clears them.
    pub fn apply_gradients(&mut self, learn_rate: f64) {
        for neuron in self.layers.iter_mut().flat_map(|layer| layer.neurons.iter_mut()) {
            neuron.apply_gradients(learn_rate);
            neuron.clear_gradients();
        }
    }
}

/// Index of the first maximal element; 0 for an empty slice.
fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate().skip(1) {
        if *x > v[best] {
            best = i;
        }
    }
    best
}
