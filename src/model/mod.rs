//! The trainable-model seam and its shipped backing.
//!
//! The pipeline treats the model as an opaque capability: fit a prepared
//! batch, produce class probabilities for a feature vector, evaluate a
//! stream of prepared batches. [`MlpNetwork`] is the backing this crate
//! ships; anything implementing [`TrainableModel`] can stand in for it.

pub mod artifact;
pub mod evaluation;
pub mod mlp;

pub use artifact::{ModelArtifact, ARTIFACT_VERSION};
pub use evaluation::EvaluationStats;
pub use mlp::{MlpConfig, MlpNetwork};

use crate::core::PreparedBatch;
use ndarray::{Array1, ArrayView1};

/// The capability the pipeline requires of a learnable model.
pub trait TrainableModel {
    /// Performs one optimization step on a prepared batch.
    fn fit(&mut self, batch: &PreparedBatch);

    /// Produces class probabilities for one flattened, normalized record.
    fn output(&self, features: ArrayView1<f32>) -> Array1<f32>;

    /// Runs prepared batches through the model and accumulates aggregate
    /// statistics against the match class.
    fn evaluate<I>(&self, batches: I, match_index: usize) -> EvaluationStats
    where
        I: Iterator<Item = PreparedBatch>,
    {
        let mut stats = EvaluationStats::default();
        for batch in batches {
            for (row, &actual) in batch.features.rows().into_iter().zip(&batch.targets) {
                let probs = self.output(row);
                let predicted = argmax(&probs);
                stats.record(predicted, actual, match_index);
            }
        }
        stats
    }
}

fn argmax(probs: &Array1<f32>) -> usize {
    probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tensor2D;

    /// A model that always predicts the class of the first feature value.
    struct FirstFeatureModel;

    impl TrainableModel for FirstFeatureModel {
        fn fit(&mut self, _batch: &PreparedBatch) {}

        fn output(&self, features: ArrayView1<f32>) -> Array1<f32> {
            if features[0] > 0.5 {
                Array1::from_vec(vec![0.1, 0.9])
            } else {
                Array1::from_vec(vec![0.9, 0.1])
            }
        }
    }

    #[test]
    fn evaluate_accumulates_across_batches() {
        let batch1 = PreparedBatch {
            features: Tensor2D::from_shape_vec((2, 1), vec![0.9, 0.1]).unwrap(),
            targets: vec![1, 0],
        };
        let batch2 = PreparedBatch {
            features: Tensor2D::from_shape_vec((1, 1), vec![0.9]).unwrap(),
            targets: vec![0],
        };

        let stats = FirstFeatureModel.evaluate(vec![batch1, batch2].into_iter(), 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.false_positives, 1);
    }
}
