pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod prompt;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use data::training_data::TrainingData;
pub use error::{Error, Result};
pub use layers::{layer::Layer, neuron::Neuron};
pub use loss::squared::SquaredError;
pub use network::network::Network;
pub use network::params::{ParamId, ParamSlot};
pub use network::shared::SharedNetwork;
pub use train::checkpoint::Checkpointer;
pub use train::gradient::{estimate_gradients, Gradients, EPSILON};
pub use train::loop_fn::train_loop;
pub use train::train_config::{TrainConfig, TrainSettings};
pub use train::train_stats::{TrainStats, TrainSummary};
