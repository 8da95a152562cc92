//! Parsing of the UCI Iris data set.
//!
//! Supported format:
//! - UTF-8, one plant per line:
//!   `sepal_length,sepal_width,petal_length,petal_width,species`
//! - Lines that do not have exactly five fields are skipped (blank lines,
//!   trailing newlines, headers with a different column count)
//! - Measurements that fail to parse read as `0.0`
//! - `species` must be one of `SPECIES`; it is one-hot encoded over 3 classes

use std::path::Path;

use log::debug;

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};

pub const DELIMITER: char = ',';
pub const FIELDS: usize = 5;

/// Species names in class-index order.
pub const SPECIES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

pub fn species_class(name: &str) -> Option<usize> {
    SPECIES.iter().position(|s| *s == name)
}

/// Parses Iris text into `TrainingData` with four inputs and three outputs.
pub fn parse_iris(text: &str) -> Result<Vec<TrainingData>> {
    let mut data = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let cells: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
        if cells.len() != FIELDS {
            continue;
        }

        let class = species_class(cells[4]).ok_or_else(|| {
            Error::Dataset(format!("Line {}: unknown species '{}'", line_idx + 1, cells[4]))
        })?;
        let inputs = cells[..4]
            .iter()
            .map(|cell| cell.parse::<f64>().unwrap_or(0.0))
            .collect();
        data.push(TrainingData::one_hot(inputs, class, SPECIES.len()));
    }
    Ok(data)
}

pub fn load_iris(path: impl AsRef<Path>) -> Result<Vec<TrainingData>> {
    let text = std::fs::read_to_string(path)?;
    let data = parse_iris(&text)?;
    debug!("loaded {} iris samples", data.len());
    Ok(data)
}
