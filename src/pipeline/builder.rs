//! The training driver.
//!
//! [`ModelBuilder`] owns the whole build lifecycle: list the corpus, split
//! it into balanced partitions, run one training pass per augmentation
//! transform (identity first) for the configured number of epochs, evaluate
//! on the held-out partition, and persist the artifact. Progress moves
//! through an explicit [`BuildState`] machine; any fatal error leaves the
//! driver in [`BuildState::Failed`].

use crate::core::{
    ClassifierError, PreparedBatch, Result, DEFAULT_BATCH_SIZE, DEFAULT_SEED,
    DEFAULT_TRAINING_RATIO, NUM_LABELS,
};
use crate::dataset::{balanced_split, list_images, AugmentationPipeline, BatchSource, LabelOracle};
use crate::model::{EvaluationStats, MlpConfig, MlpNetwork, ModelArtifact, TrainableModel};
use crate::processors::PixelScaler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, info};

/// Lifecycle states of one build run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Nothing has happened yet.
    Initialized,
    /// Listing and splitting the corpus.
    SplittingData,
    /// Running training pass `pass` of `total`.
    Training {
        /// 1-based index of the current pass.
        pass: usize,
        /// Total number of passes, identity included.
        total: usize,
    },
    /// Running the held-out partition through the model.
    Evaluating,
    /// Terminal success: the artifact is on disk.
    Persisted,
    /// Terminal failure.
    Failed,
}

/// Builds, evaluates, and persists a classifier model.
#[derive(Debug)]
pub struct ModelBuilder {
    epochs: usize,
    batch_size: usize,
    training_ratio: f64,
    seed: u64,
    augmentation: AugmentationPipeline,
    state: BuildState,
}

impl ModelBuilder {
    /// Creates a driver running `epochs` epochs per pass, with defaults
    /// for everything else: batch size 16, ratio 0.8, seed 42, and one
    /// mirrored augmentation pass.
    pub fn new(epochs: usize) -> Self {
        Self {
            epochs,
            batch_size: DEFAULT_BATCH_SIZE,
            training_ratio: DEFAULT_TRAINING_RATIO,
            seed: DEFAULT_SEED,
            augmentation: AugmentationPipeline::standard(),
            state: BuildState::Initialized,
        }
    }

    /// Sets the number of records per batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the fraction of each balanced label group used for training.
    pub fn with_training_ratio(mut self, ratio: f64) -> Self {
        self.training_ratio = ratio;
        self
    }

    /// Sets the seed for the split and for weight initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the augmentation pipeline.
    pub fn with_augmentation(mut self, augmentation: AugmentationPipeline) -> Self {
        self.augmentation = augmentation;
        self
    }

    /// The driver's current lifecycle state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(ClassifierError::config("epochs must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(ClassifierError::config("batch size must be greater than 0"));
        }
        Ok(())
    }

    /// Runs the full build: split, train, evaluate, persist.
    ///
    /// Returns the evaluation statistics; the persisted artifact lands at
    /// `model_path` regardless of evaluation quality.
    ///
    /// # Errors
    ///
    /// Fatal errors ([`ClassifierError::Config`] from the split,
    /// [`ClassifierError::EvaluationSetup`] for an empty test set,
    /// [`ClassifierError::Artifact`] from persistence) leave the driver in
    /// [`BuildState::Failed`]. Per-record decode failures are not fatal;
    /// the batch source logs and skips them.
    pub fn build(
        &mut self,
        images_dir: &Path,
        model_path: &Path,
        oracle: LabelOracle,
    ) -> Result<EvaluationStats> {
        let result = self.run(images_dir, model_path, &oracle);
        if result.is_err() {
            self.state = BuildState::Failed;
        }
        result
    }

    fn run(
        &mut self,
        images_dir: &Path,
        model_path: &Path,
        oracle: &LabelOracle,
    ) -> Result<EvaluationStats> {
        self.validate()?;

        self.state = BuildState::SplittingData;
        info!(path = %images_dir.display(), "loading data");
        let corpus = list_images(images_dir)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (train, test) = balanced_split(corpus, oracle, self.training_ratio, &mut rng)?;

        let labels = train.labels();
        if labels.len() != NUM_LABELS {
            return Err(ClassifierError::config(format!(
                "expected {NUM_LABELS} labels, corpus produced {}: [{}]",
                labels.len(),
                labels.join(", ")
            )));
        }
        let match_index = match oracle.match_label() {
            Some(label) => labels
                .iter()
                .position(|l| l == label)
                .unwrap_or(labels.len() - 1),
            None => labels.len() - 1,
        };

        info!("building model");
        let mut model = MlpNetwork::new(MlpConfig {
            seed: self.seed,
            ..MlpConfig::default()
        });

        let total = self.augmentation.pass_count();
        let mut train_scaler = PixelScaler::default();
        for (i, transform) in self.augmentation.passes().enumerate() {
            self.state = BuildState::Training {
                pass: i + 1,
                total,
            };
            let name = transform.map_or("identity", |t| t.name());
            let scaler_source = BatchSource::new(&train, transform, self.batch_size);
            info!(
                pass = i + 1,
                total,
                transform = name,
                samples = scaler_source.remaining(),
                "training pass"
            );

            let scaler = PixelScaler::fit(scaler_source);
            if transform.is_none() {
                train_scaler = scaler;
            }
            for epoch in 0..self.epochs {
                debug!(epoch = epoch + 1, epochs = self.epochs, "epoch");
                for batch in BatchSource::new(&train, transform, self.batch_size) {
                    model.fit(&batch.prepare(&scaler));
                }
            }
        }

        self.state = BuildState::Evaluating;
        info!(samples = test.len(), "evaluating model");
        let test_scaler = PixelScaler::fit(BatchSource::new(&test, None, self.batch_size));
        let prepared: Vec<PreparedBatch> = BatchSource::new(&test, None, self.batch_size)
            .map(|b| b.prepare(&test_scaler))
            .collect();
        if prepared.iter().map(PreparedBatch::len).sum::<usize>() == 0 {
            return Err(ClassifierError::EvaluationSetup {
                message: "no test records could be loaded".into(),
            });
        }
        let stats = model.evaluate(prepared.into_iter(), match_index);
        info!("\n{stats}");
        info!(labels = ?labels, "labels");

        info!(path = %model_path.display(), "saving model");
        let artifact = ModelArtifact {
            labels,
            match_index,
            scaler: train_scaler,
            model,
        };
        artifact.save(model_path)?;
        self.state = BuildState::Persisted;
        Ok(stats)
    }
}
