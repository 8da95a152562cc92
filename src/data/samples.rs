//! Parsing of 2-D point sample files.
//!
//! Supported format:
//! - UTF-8, one sample per line: `x|y|class`
//! - Lines starting with `#` are comments; blank lines are skipped
//! - `x` and `y` that fail to parse read as `0.0`, a bad class reads as `0`
//! - `class` is one-hot encoded into a vector of length `n_classes`

use std::path::Path;

use log::debug;

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};

pub const COMMENT_MARKER: char = '#';
pub const DELIMITER: char = '|';

/// Parses sample text into `TrainingData` with two inputs each.
pub fn parse_samples(text: &str, n_classes: usize) -> Result<Vec<TrainingData>> {
    if n_classes < 2 {
        return Err(Error::Dataset(format!("n_classes must be at least 2, got {}", n_classes)));
    }

    let mut data = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let cells: Vec<&str> = line.split(DELIMITER).collect();
        if cells.len() < 3 {
            return Err(Error::Dataset(format!(
                "Line {}: expected `x{d}y{d}class`, got '{}'",
                line_idx + 1, line, d = DELIMITER
            )));
        }

        let x = cells[0].trim().parse::<f64>().unwrap_or(0.0);
        let y = cells[1].trim().parse::<f64>().unwrap_or(0.0);
        let class = cells[2].trim().parse::<usize>().unwrap_or(0);
        if class >= n_classes {
            return Err(Error::Dataset(format!(
                "Line {}: class {} >= n_classes {}",
                line_idx + 1, class, n_classes
            )));
        }

        data.push(TrainingData::one_hot(vec![x, y], class, n_classes));
    }
    Ok(data)
}

pub fn load_samples(path: impl AsRef<Path>, n_classes: usize) -> Result<Vec<TrainingData>> {
    let text = std::fs::read_to_string(path)?;
    let data = parse_samples(&text, n_classes)?;
    debug!("loaded {} point samples", data.len());
    Ok(data)
}

/// The XOR dataset: 4 samples, 2 inputs, one-hot over 2 classes.
pub fn builtin_xor() -> Vec<TrainingData> {
    vec![
        TrainingData::one_hot(vec![0.0, 0.0], 0, 2),
        TrainingData::one_hot(vec![0.0, 1.0], 1, 2),
        TrainingData::one_hot(vec![1.0, 0.0], 1, 2),
        TrainingData::one_hot(vec![1.0, 1.0], 0, 2),
    ]
}
