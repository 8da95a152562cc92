use rayon::prelude::*;

use crate::data::training_data::TrainingData;
use crate::error::Result;
use crate::network::network::Network;
use crate::network::params::{ParamId, ParamSlot};

/// Step added to a parameter when probing the slope of the cost.
pub const EPSILON: f64 = 1e-5;

/// Forward-difference estimates for one neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronGradient {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Gradient estimates for a whole network, shaped like its layers, plus the
/// baseline cost they were measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub baseline: f64,
    pub layers: Vec<Vec<NeuronGradient>>,
}

impl Gradients {
    pub fn get(&self, id: ParamId) -> Option<f64> {
        let neuron = self.layers.get(id.layer)?.get(id.neuron)?;
        match id.slot {
            ParamSlot::Weight(i) => neuron.weights.get(i).copied(),
            ParamSlot::Bias => Some(neuron.bias),
        }
    }
}

/// Estimates ∂cost/∂p for every parameter p of `network` over `data`.
///
/// One rayon task per neuron. Each task clones the network once and probes
/// that neuron's weights and bias on its clone, restoring the exact previous
/// value after each probe, so every estimate is taken against the unmodified
/// network plus a single step. `network` itself is only read.
pub fn estimate_gradients(network: &Network, data: &[TrainingData]) -> Result<Gradients> {
    let baseline = network.average_cost(data)?;

    let layers = network.layers.par_iter()
        .enumerate()
        .map(|(l, layer)| {
            (0..layer.size())
                .into_par_iter()
                .map(|n| probe_neuron(network, data, baseline, l, n))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Gradients { baseline, layers })
}

fn probe_neuron(
    network: &Network,
    data: &[TrainingData],
    baseline: f64,
    layer: usize,
    neuron: usize,
) -> Result<NeuronGradient> {
    let mut probe = network.clone();
    let incoming = probe.layers[layer].neurons[neuron].incoming();

    let weights = (0..incoming)
        .map(|i| slope(&mut probe, data, baseline, ParamId::weight(layer, neuron, i)))
        .collect::<Result<Vec<_>>>()?;
    let bias = slope(&mut probe, data, baseline, ParamId::bias(layer, neuron))?;

    Ok(NeuronGradient { weights, bias })
}

/// (cost(p + ε) - baseline) / ε, leaving `probe` as it was found.
fn slope(probe: &mut Network, data: &[TrainingData], baseline: f64, id: ParamId) -> Result<f64> {
    let original = probe.param(id)?;
    probe.set_param(id, original + EPSILON)?;
    let perturbed = probe.average_cost(data);
    probe.set_param(id, original)?;
    Ok((perturbed? - baseline) / EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn matches_analytic_derivative_on_single_neuron() {
        let mut network = Network::from_layer_sizes(&[1, 1]).unwrap();
        network.set_weight(0, 0, 0, 0.3).unwrap();
        network.set_bias(0, 0, -0.2).unwrap();
        let data = vec![TrainingData::new(vec![2.0], vec![1.0])];

        let grads = estimate_gradients(&network, &data).unwrap();

        // d/dw (σ(wx+b) - y)² = 2(σ - y)·σ(1-σ)·x
        let s = sigmoid(0.3 * 2.0 - 0.2);
        let d_bias = 2.0 * (s - 1.0) * s * (1.0 - s);
        let d_weight = d_bias * 2.0;
        assert!((grads.get(ParamId::weight(0, 0, 0)).unwrap() - d_weight).abs() < 1e-4);
        assert!((grads.get(ParamId::bias(0, 0)).unwrap() - d_bias).abs() < 1e-4);
    }

    #[test]
    fn probing_leaves_network_untouched() {
        let network = Network::from_layer_sizes(&[3, 4, 2]).unwrap();
        let before = network.clone();
        let data = vec![
            TrainingData::new(vec![0.1, 0.5, 0.9], vec![1.0, 0.0]),
            TrainingData::new(vec![0.7, 0.2, 0.3], vec![0.0, 1.0]),
        ];
        let grads = estimate_gradients(&network, &data).unwrap();
        assert_eq!(network, before);
        assert_eq!(grads.layers.len(), 2);
        assert_eq!(grads.layers[0].len(), 4);
        assert_eq!(grads.layers[1][1].weights.len(), 4);
        assert_eq!(grads.baseline, network.average_cost(&data).unwrap());
    }

    #[test]
    fn gradient_shape_mismatch_is_reported() {
        let network = Network::from_layer_sizes(&[2, 1]).unwrap();
        let data = vec![TrainingData::new(vec![1.0], vec![1.0])];
        assert!(matches!(
            estimate_gradients(&network, &data),
            Err(Error::SizeMismatch { .. })
        ));
        assert!(matches!(estimate_gradients(&network, &[]), Err(Error::EmptyDataset)));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let network = Network::from_layer_sizes(&[1, 1]).unwrap();
        let data = vec![TrainingData::new(vec![1.0], vec![0.0])];
        let grads = estimate_gradients(&network, &data).unwrap();
        assert!(grads.get(ParamId::weight(0, 0, 1)).is_none());
        assert!(grads.get(ParamId::bias(1, 0)).is_none());
    }
}
