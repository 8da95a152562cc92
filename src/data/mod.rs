pub mod idx;
pub mod iris;
pub mod samples;
pub mod training_data;

pub use training_data::{max_per_dimension, TrainingData};
