//! Batch primitives for the classification pipeline.
//!
//! This module defines the tensor type aliases used throughout the crate and
//! the record/batch structures the data pipeline hands to the model. A
//! [`Batch`] holds raw decoded pixel tensors; [`Batch::prepare`] applies a
//! fitted scaler and flattens the records into the 2-D feature matrix the
//! model consumes.

use crate::core::FEATURE_LEN;
use crate::processors::PixelScaler;
use ndarray::Array1;
use std::path::PathBuf;

/// A 2-dimensional tensor of f32 values.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 3-dimensional tensor of f32 values (height x width x channels).
pub type Tensor3D = ndarray::Array3<f32>;

/// A 4-dimensional tensor of f32 values (batch x height x width x channels).
pub type Tensor4D = ndarray::Array4<f32>;

/// One labeled image, decoded into a fixed-size pixel tensor.
///
/// Records only live for the duration of the batch that contains them; the
/// canonical identity of an example is its file path in the partition.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Path the pixels were decoded from.
    pub path: PathBuf,
    /// Decoded pixels, height x width x channels, raw (unnormalized) values.
    pub pixels: Tensor3D,
    /// Index of the record's label in the sorted label vocabulary.
    pub label: usize,
}

/// A fixed-size group of records drawn from one partition.
///
/// Every batch from a [`BatchSource`](crate::dataset::BatchSource) has the
/// configured size except possibly the final one, which may be shorter.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// The records in this batch, in deterministic partition order.
    pub records: Vec<ImageRecord>,
}

impl Batch {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Normalizes and flattens the batch into model-ready form.
    ///
    /// Each record's pixel tensor is rescaled with `scaler` and flattened
    /// row-major into one row of the feature matrix.
    pub fn prepare(&self, scaler: &PixelScaler) -> PreparedBatch {
        let mut features = Tensor2D::zeros((self.records.len(), FEATURE_LEN));
        let mut targets = Vec::with_capacity(self.records.len());
        for (i, record) in self.records.iter().enumerate() {
            let scaled = scaler.apply(&record.pixels);
            let flat: Array1<f32> = Array1::from_iter(scaled.iter().copied());
            features.row_mut(i).assign(&flat);
            targets.push(record.label);
        }
        PreparedBatch { features, targets }
    }
}

/// A normalized, flattened batch ready for the model.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    /// One row per record, `FEATURE_LEN` columns of [0,1] values.
    pub features: Tensor2D,
    /// Label index per record, parallel to the feature rows.
    pub targets: Vec<usize>,
}

impl PreparedBatch {
    /// Number of records in the prepared batch.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when the prepared batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH};

    fn record(value: f32, label: usize) -> ImageRecord {
        ImageRecord {
            path: PathBuf::from(format!("r{label}.jpg")),
            pixels: Tensor3D::from_elem(
                (IMAGE_HEIGHT as usize, IMAGE_WIDTH as usize, IMAGE_CHANNELS),
                value,
            ),
            label,
        }
    }

    #[test]
    fn prepare_flattens_and_scales() {
        let batch = Batch {
            records: vec![record(0.0, 0), record(255.0, 1)],
        };
        let scaler = PixelScaler::new(0.0, 255.0);
        let prepared = batch.prepare(&scaler);

        assert_eq!(prepared.features.shape(), &[2, FEATURE_LEN]);
        assert_eq!(prepared.targets, vec![0, 1]);
        assert!(prepared.features.row(0).iter().all(|&v| v == 0.0));
        assert!(prepared.features.row(1).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn empty_batch_prepares_to_empty_matrix() {
        let batch = Batch::default();
        let prepared = batch.prepare(&PixelScaler::new(0.0, 255.0));
        assert!(prepared.is_empty());
        assert_eq!(prepared.features.nrows(), 0);
    }
}
