//! Pixel normalization for the classification pipeline.
//!
//! A [`PixelScaler`] rescales raw pixel values into [0,1] using min/max
//! statistics fit from one specific subset of the data. Train and test
//! passes each fit their own scaler; the training-fitted scaler is baked
//! into the persisted artifact so inference never refits.

use crate::core::{Batch, Tensor3D};
use serde::{Deserialize, Serialize};

/// Affine rescaler mapping a subset's pixel range onto [0,1].
///
/// Fit once per logical subset (train pass, test pass) from that subset's
/// own records only. Sharing a scaler across subsets would leak statistics
/// between partitions, which the pipeline prevents by letting each call
/// site own its own fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelScaler {
    /// Smallest raw pixel value observed during the fit.
    pub min: f32,
    /// Largest raw pixel value observed during the fit.
    pub max: f32,
}

impl PixelScaler {
    /// Creates a scaler from explicit bounds.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Fits min/max statistics from one full pass over a subset's batches.
    ///
    /// Consumes the iterator; callers re-open a fresh batch source for the
    /// passes that follow. An empty subset yields the conventional byte
    /// range so applying the scaler is still well defined.
    pub fn fit<I>(batches: I) -> Self
    where
        I: Iterator<Item = Batch>,
    {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for batch in batches {
            for record in &batch.records {
                for &value in record.pixels.iter() {
                    min = min.min(value);
                    max = max.max(value);
                }
            }
        }
        if min > max {
            // Nothing observed; fall back to the raw byte range.
            return Self::new(0.0, 255.0);
        }
        Self { min, max }
    }

    /// Rescales a pixel tensor into [0,1] using the fitted bounds.
    ///
    /// A degenerate fit (all pixels identical) divides by 1 so constant
    /// inputs map to 0 instead of NaN.
    pub fn apply(&self, pixels: &Tensor3D) -> Tensor3D {
        let span = self.max - self.min;
        let span = if span > 0.0 { span } else { 1.0 };
        pixels.mapv(|v| (v - self.min) / span)
    }
}

impl Default for PixelScaler {
    fn default() -> Self {
        Self::new(0.0, 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ImageRecord;
    use std::path::PathBuf;

    fn batch_of(values: &[f32]) -> Batch {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &v)| ImageRecord {
                path: PathBuf::from(format!("{i}.jpg")),
                pixels: Tensor3D::from_elem((2, 2, 3), v),
                label: 0,
            })
            .collect();
        Batch { records }
    }

    #[test]
    fn fit_tracks_min_and_max_across_batches() {
        let batches = vec![batch_of(&[10.0, 200.0]), batch_of(&[55.0])];
        let scaler = PixelScaler::fit(batches.into_iter());
        assert_eq!(scaler.min, 10.0);
        assert_eq!(scaler.max, 200.0);
    }

    #[test]
    fn apply_maps_bounds_to_unit_interval() {
        let scaler = PixelScaler::new(10.0, 210.0);
        let pixels = Tensor3D::from_elem((1, 1, 3), 110.0);
        let scaled = scaler.apply(&pixels);
        assert!(scaled.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn distinct_subsets_fit_distinct_stats() {
        let train = PixelScaler::fit(vec![batch_of(&[0.0, 100.0])].into_iter());
        let test = PixelScaler::fit(vec![batch_of(&[50.0, 250.0])].into_iter());
        assert_ne!(train, test);
    }

    #[test]
    fn degenerate_fit_does_not_produce_nan() {
        let scaler = PixelScaler::fit(vec![batch_of(&[128.0])].into_iter());
        let scaled = scaler.apply(&Tensor3D::from_elem((1, 1, 3), 128.0));
        assert!(scaled.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_fit_falls_back_to_byte_range() {
        let scaler = PixelScaler::fit(std::iter::empty());
        assert_eq!(scaler, PixelScaler::new(0.0, 255.0));
    }
}
