/// Which value of a neuron a `ParamId` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    Weight(usize),
    Bias,
}

/// Stable address of one trainable parameter: (layer, neuron, weight-or-bias).
///
/// Layer 0 is the first layer that holds neurons; the raw inputs are not a
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId {
    pub layer: usize,
    pub neuron: usize,
    pub slot: ParamSlot,
}

impl ParamId {
    pub fn weight(layer: usize, neuron: usize, index: usize) -> ParamId {
        ParamId { layer, neuron, slot: ParamSlot::Weight(index) }
    }

    pub fn bias(layer: usize, neuron: usize) -> ParamId {
        ParamId { layer, neuron, slot: ParamSlot::Bias }
    }
}
