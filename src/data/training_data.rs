use serde::{Deserialize, Serialize};

/// One labeled sample: what the network is fed and what it should answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

impl TrainingData {
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> TrainingData {
        TrainingData { inputs, outputs }
    }

    /// A sample whose expected output is `class` one-hot encoded over `n_classes`.
    /// The caller guarantees `class < n_classes`.
    pub fn one_hot(inputs: Vec<f64>, class: usize, n_classes: usize) -> TrainingData {
        let mut outputs = vec![0.0; n_classes];
        outputs[class] = 1.0;
        TrainingData { inputs, outputs }
    }
}

/// Largest absolute value seen in each input dimension, for use with
/// `Network::normalize_set`. Dimensions that are zero everywhere map to 1.0.
pub fn max_per_dimension(data: &[TrainingData]) -> Vec<f64> {
    let width = data.iter().map(|s| s.inputs.len()).max().unwrap_or(0);
    let mut max = vec![0.0f64; width];
    for sample in data {
        for (m, x) in max.iter_mut().zip(sample.inputs.iter()) {
            *m = m.max(x.abs());
        }
    }
    max.iter_mut().filter(|m| **m == 0.0).for_each(|m| *m = 1.0);
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_marks_class() {
        let sample = TrainingData::one_hot(vec![1.0], 2, 4);
        assert_eq!(sample.outputs, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn max_per_dimension_uses_magnitude() {
        let data = vec![
            TrainingData::new(vec![-300.0, 0.0, 2.0], vec![]),
            TrainingData::new(vec![100.0, 0.0, 4.0], vec![]),
        ];
        assert_eq!(max_per_dimension(&data), vec![300.0, 1.0, 4.0]);
        assert!(max_per_dimension(&[]).is_empty());
    }
}
