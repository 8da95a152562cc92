// Save/load behaviour of the JSON network format.

use std::path::PathBuf;

use slope_nn::{Error, Network};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("slope-nn-{}-{}.json", name, std::process::id()))
}

#[test]
fn round_trip_preserves_predictions() {
    let network = Network::from_layer_sizes(&[3, 4, 2]).unwrap();
    let path = temp_path("round-trip");
    network.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.layer_sizes(), vec![3, 4, 2]);
    for input in [[0.0, 0.0, 0.0], [0.2, -0.7, 1.0], [5.0, 3.0, -2.0]] {
        let a = network.predict(&input).unwrap();
        let b = loaded.predict(&input).unwrap();
        assert!(a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12));
    }
}

#[test]
fn saving_twice_overwrites() {
    let path = temp_path("overwrite");
    Network::from_layer_sizes(&[8, 8, 8]).unwrap().save_json(&path).unwrap();
    let small = Network::from_layer_sizes(&[1, 1]).unwrap();
    small.save_json(&path).unwrap();

    let loaded = Network::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.layer_sizes(), vec![1, 1]);
    assert!((loaded.weight(0, 0, 0).unwrap() - small.weight(0, 0, 0).unwrap()).abs() < 1e-12);
}

#[test]
fn document_has_expected_shape() {
    let network = Network::from_layer_sizes(&[2, 1]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&network.to_json_string().unwrap()).unwrap();
    assert_eq!(value["inputs"], 2);
    let neuron = &value["layers"][0]["neurons"][0];
    assert_eq!(neuron["weights"].as_array().unwrap().len(), 2);
    assert_eq!(neuron["bias"], 0.0);
    assert!(neuron.get("grad_weights").is_none());
}

#[test]
fn unknown_keys_are_ignored() {
    let text = r#"{
        "inputs": 1,
        "version": 3,
        "layers": [ { "neurons": [ { "weights": [0.5], "bias": 0.1, "label": "a" } ], "note": true } ]
    }"#;
    let network = Network::from_json_str(text).unwrap();
    assert_eq!(network.weight(0, 0, 0).unwrap(), 0.5);
    assert_eq!(network.bias(0, 0).unwrap(), 0.1);
}

#[test]
fn missing_file_is_io_error() {
    let path = temp_path("does-not-exist");
    std::fs::remove_file(&path).ok();
    assert!(matches!(Network::load_json(&path), Err(Error::Io(_))));
}

#[test]
fn corrupt_file_is_json_error() {
    let path = temp_path("corrupt");
    std::fs::write(&path, "{ \"inputs\": 2, \"layers\": [").unwrap();
    let result = Network::load_json(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn inconsistent_topology_is_rejected() {
    let wrong_arity = r#"{"inputs":2,"layers":[{"neurons":[{"weights":[0.5],"bias":0}]}]}"#;
    assert!(matches!(Network::from_json_str(wrong_arity), Err(Error::InvalidTopology(_))));
    let no_layers = r#"{"inputs":2,"layers":[]}"#;
    assert!(matches!(Network::from_json_str(no_layers), Err(Error::InvalidTopology(_))));
}
