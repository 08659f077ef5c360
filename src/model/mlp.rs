//! The MLP backing the trainable-model seam.
//!
//! A seeded single-hidden-layer perceptron: input -> hidden (ReLU) ->
//! output (softmax), trained with minibatch SGD on cross-entropy loss.
//! The pipeline only ever talks to it through [`TrainableModel`], so the
//! backing can be swapped without touching the data path.

use crate::core::{PreparedBatch, FEATURE_LEN, NUM_LABELS};
use crate::model::TrainableModel;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for the MLP backing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Flattened input length.
    pub input_size: usize,
    /// Hidden layer width.
    pub hidden_size: usize,
    /// Number of output classes.
    pub output_size: usize,
    /// Seed for weight initialization.
    pub seed: u64,
    /// SGD step size.
    pub learning_rate: f32,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            input_size: FEATURE_LEN,
            hidden_size: 64,
            output_size: NUM_LABELS,
            seed: 42,
            learning_rate: 0.01,
        }
    }
}

/// Single-hidden-layer MLP with seeded Xavier initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpNetwork {
    config: MlpConfig,
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
}

impl MlpNetwork {
    /// Creates a network with weights drawn from the configured seed.
    pub fn new(config: MlpConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);

        let w1_scale = (2.0 / config.input_size as f32).sqrt();
        let w1 = Array2::from_shape_fn((config.hidden_size, config.input_size), |_| {
            (rng.gen::<f32>() - 0.5) * 2.0 * w1_scale
        });
        let b1 = Array1::zeros(config.hidden_size);

        let w2_scale = (2.0 / config.hidden_size as f32).sqrt();
        let w2 = Array2::from_shape_fn((config.output_size, config.hidden_size), |_| {
            (rng.gen::<f32>() - 0.5) * 2.0 * w2_scale
        });
        let b2 = Array1::zeros(config.output_size);

        Self {
            config,
            w1,
            b1,
            w2,
            b2,
        }
    }

    fn forward(&self, features: ArrayView1<f32>) -> (Array1<f32>, Array1<f32>) {
        let hidden = (self.w1.dot(&features) + &self.b1).mapv(|v| v.max(0.0));
        let logits = self.w2.dot(&hidden) + &self.b2;
        (hidden, softmax(&logits))
    }
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

impl TrainableModel for MlpNetwork {
    fn fit(&mut self, batch: &PreparedBatch) {
        if batch.is_empty() {
            return;
        }

        let mut dw1 = Array2::<f32>::zeros(self.w1.raw_dim());
        let mut db1 = Array1::<f32>::zeros(self.b1.raw_dim());
        let mut dw2 = Array2::<f32>::zeros(self.w2.raw_dim());
        let mut db2 = Array1::<f32>::zeros(self.b2.raw_dim());

        for (row, &target) in batch.features.rows().into_iter().zip(&batch.targets) {
            let (hidden, probs) = self.forward(row);

            // Softmax cross-entropy: dlogits = p - onehot(target).
            let mut dlogits = probs;
            dlogits[target] -= 1.0;

            dw2 += &dlogits
                .view()
                .insert_axis(Axis(1))
                .dot(&hidden.view().insert_axis(Axis(0)));
            db2 += &dlogits;

            let mut dhidden = self.w2.t().dot(&dlogits);
            dhidden
                .iter_mut()
                .zip(hidden.iter())
                .for_each(|(g, &h)| {
                    if h <= 0.0 {
                        *g = 0.0;
                    }
                });

            dw1 += &dhidden
                .view()
                .insert_axis(Axis(1))
                .dot(&row.insert_axis(Axis(0)));
            db1 += &dhidden;
        }

        let step = self.config.learning_rate / batch.len() as f32;
        self.w1 -= &(dw1 * step);
        self.b1 -= &(db1 * step);
        self.w2 -= &(dw2 * step);
        self.b2 -= &(db2 * step);
    }

    fn output(&self, features: ArrayView1<f32>) -> Array1<f32> {
        self.forward(features).1
    }
}
