pub mod checkpoint;
pub mod gradient;
pub mod loop_fn;
pub mod train_config;
pub mod train_stats;

pub use checkpoint::Checkpointer;
pub use gradient::{estimate_gradients, Gradients, NeuronGradient, EPSILON};
pub use loop_fn::train_loop;
pub use train_config::{TrainConfig, TrainSettings};
pub use train_stats::{TrainStats, TrainSummary};
