// Finite-difference descent behaviour of `Network::learn`.

use slope_nn::{estimate_gradients, Error, Network, TrainingData};

fn toy_data() -> Vec<TrainingData> {
    vec![
        TrainingData::new(vec![0.9, 0.1], vec![1.0, 0.0]),
        TrainingData::new(vec![0.2, 0.8], vec![0.0, 1.0]),
    ]
}

#[test]
fn one_step_usually_lowers_cost() {
    let data = toy_data();
    let trials = 30;
    let mut improved = 0;
    for _ in 0..trials {
        let mut network = Network::from_layer_sizes(&[2, 2]).unwrap();
        let before = network.average_cost(&data).unwrap();
        network.learn(&data, 0.1).unwrap();
        let after = network.average_cost(&data).unwrap();
        if after < before {
            improved += 1;
        }
    }
    assert!(improved >= trials - 2, "only {} of {} steps lowered the cost", improved, trials);
}

#[test]
fn repeated_steps_keep_descending() {
    let data = toy_data();
    let mut network = Network::from_layer_sizes(&[2, 3, 2]).unwrap();
    let start = network.average_cost(&data).unwrap();
    for _ in 0..200 {
        network.learn(&data, 1.0).unwrap();
    }
    let end = network.average_cost(&data).unwrap();
    assert!(end < start, "cost went from {} to {}", start, end);
}

#[test]
fn learn_applies_estimated_gradients() {
    let data = toy_data();
    let network = Network::from_layer_sizes(&[2, 2, 2]).unwrap();
    let gradients = estimate_gradients(&network, &data).unwrap();

    let mut stepped = network.clone();
    stepped.learn(&data, 0.5).unwrap();

    for id in network.param_ids() {
        let expected = network.param(id).unwrap() - gradients.get(id).unwrap() * 0.5;
        assert!((stepped.param(id).unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn zero_learn_rate_changes_nothing() {
    let data = toy_data();
    let network = Network::from_layer_sizes(&[2, 2]).unwrap();
    let mut copy = network.clone();
    copy.learn(&data, 0.0).unwrap();
    assert_eq!(copy, network);
}

#[test]
fn failed_learn_leaves_network_untouched() {
    let mut network = Network::from_layer_sizes(&[2, 2]).unwrap();
    let before = network.clone();

    assert!(matches!(network.learn(&[], 0.5), Err(Error::EmptyDataset)));
    let misshapen = vec![TrainingData::new(vec![1.0, 2.0, 3.0], vec![1.0, 0.0])];
    assert!(matches!(network.learn(&misshapen, 0.5), Err(Error::SizeMismatch { .. })));

    assert_eq!(network, before);
}
