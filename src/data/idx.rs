//! Decoding of IDX binary files (MNIST and its derivatives) into
//! `TrainingData`.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic: uint8 data, 3 dimensions)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (big-endian u32)
//! bytes 12-15:  cols        (big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, one u8 per pixel
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic: uint8 data, 1 dimension)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```
//!
//! Pixels are returned as raw values in `[0, 255]`; scale them with
//! `Network::normalize_set` before training.

use std::path::Path;

use log::debug;

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// Header of an IDX3 image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
}

impl ImageHeader {
    pub fn pixels(&self) -> usize {
        self.rows * self.cols
    }
}

pub fn parse_image_header(bytes: &[u8]) -> Result<ImageHeader> {
    if bytes.len() < 16 {
        return Err(Error::Dataset(format!(
            "IDX image file too short: expected at least 16 header bytes, got {}",
            bytes.len()
        )));
    }
    let magic = read_be_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(Error::Dataset(format!(
            "IDX image file: magic number must be {:#010x}, got {:#010x}",
            IMAGE_MAGIC, magic
        )));
    }
    Ok(ImageHeader {
        count: read_be_u32(bytes, 4) as usize,
        rows: read_be_u32(bytes, 8) as usize,
        cols: read_be_u32(bytes, 12) as usize,
    })
}

/// Raw pixel rows, one `Vec<f64>` of `rows * cols` values per image.
pub fn parse_images(bytes: &[u8]) -> Result<Vec<Vec<f64>>> {
    let header = parse_image_header(bytes)?;
    let n_pixels = header.pixels();
    let required = header.count.checked_mul(n_pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| Error::Dataset("IDX image file: data length overflows usize".into()))?;
    if bytes.len() < required {
        return Err(Error::Dataset(format!(
            "IDX image file too short: header declares {} images of {}x{} pixels \
             ({} bytes needed), but file is only {} bytes",
            header.count, header.rows, header.cols, required, bytes.len()
        )));
    }
    if n_pixels == 0 {
        return Ok(vec![Vec::new(); header.count]);
    }

    Ok(bytes[16..required]
        .chunks_exact(n_pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f64).collect())
        .collect())
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        return Err(Error::Dataset(format!(
            "IDX label file too short: expected at least 8 header bytes, got {}",
            bytes.len()
        )));
    }
    let magic = read_be_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(Error::Dataset(format!(
            "IDX label file: magic number must be {:#010x}, got {:#010x}",
            LABEL_MAGIC, magic
        )));
    }
    let count = read_be_u32(bytes, 4) as usize;
    if bytes.len() < 8 + count {
        return Err(Error::Dataset(format!(
            "IDX label file too short: header declares {} labels but file is only {} bytes",
            count, bytes.len()
        )));
    }
    Ok(bytes[8..8 + count].to_vec())
}

/// Pairs images with one-hot labels of length `n_classes`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<Vec<TrainingData>> {
    if n_classes < 2 {
        return Err(Error::Dataset(format!("n_classes must be at least 2, got {}", n_classes)));
    }
    let images = parse_images(image_bytes)?;
    let labels = parse_labels(label_bytes)?;
    if images.len() != labels.len() {
        return Err(Error::Dataset(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            images.len(), labels.len()
        )));
    }

    images.into_iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (pixels, label))| {
            let class = label as usize;
            if class >= n_classes {
                return Err(Error::Dataset(format!(
                    "IDX label at index {}: class {} is out of range for n_classes={}",
                    i, class, n_classes
                )));
            }
            Ok(TrainingData::one_hot(pixels, class, n_classes))
        })
        .collect()
}

/// Reads and pairs an image file and a label file.
pub fn load_idx_pair(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
) -> Result<Vec<TrainingData>> {
    let image_bytes = std::fs::read(image_path)?;
    let label_bytes = std::fs::read(label_path)?;
    let data = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    debug!("loaded {} IDX samples", data.len());
    Ok(data)
}

fn read_be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
