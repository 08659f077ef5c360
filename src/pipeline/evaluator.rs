//! Whole-directory evaluation of a persisted model.
//!
//! Unlike the build-time evaluation, which uses the held-out side of the
//! balanced split, the evaluator treats an entire directory as evaluation
//! data, labeling every file through a caption oracle against the given
//! target. The pixel scaler is fit on this subset alone, per the
//! per-subset normalization contract.

use crate::core::{ClassifierError, PreparedBatch, Result, DEFAULT_BATCH_SIZE};
use crate::dataset::{list_images, BatchSource, LabelOracle};
use crate::model::{EvaluationStats, MlpNetwork, ModelArtifact, TrainableModel};
use crate::processors::PixelScaler;
use std::path::Path;
use tracing::{info, warn};

/// Evaluates a persisted model over a directory of captioned images.
#[derive(Debug)]
pub struct Evaluator {
    artifact: ModelArtifact<MlpNetwork>,
}

impl Evaluator {
    /// Loads a persisted model artifact.
    ///
    /// # Errors
    ///
    /// Fails fatally when the artifact is missing, corrupt, or carries an
    /// incompatible version.
    pub fn load(model_path: &Path) -> Result<Self> {
        info!(path = %model_path.display(), "loading model");
        let artifact = ModelArtifact::load(model_path)?;
        Ok(Self { artifact })
    }

    /// Evaluates every image under `images_dir`, labeling by whether the
    /// embedded description matches `target_label`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::EvaluationSetup`] when the directory
    /// holds no images or none of them decode.
    pub fn evaluate(&self, images_dir: &Path, target_label: &str) -> Result<EvaluationStats> {
        let oracle = LabelOracle::caption(target_label);
        let Some(labels) = oracle.known_labels() else {
            return Err(ClassifierError::config(
                "evaluation requires an oracle with a fixed vocabulary",
            ));
        };
        if labels != self.artifact.labels {
            warn!(
                evaluation = ?labels,
                trained = ?self.artifact.labels,
                "evaluation vocabulary differs from the one the model was trained on"
            );
        }
        let match_index = labels
            .iter()
            .position(|l| Some(l.as_str()) == oracle.match_label())
            .unwrap_or(labels.len() - 1);

        let corpus = list_images(images_dir)?;
        if corpus.is_empty() {
            return Err(ClassifierError::EvaluationSetup {
                message: format!("no images found under {}", images_dir.display()),
            });
        }
        info!(samples = corpus.len(), "evaluating model");

        let mut entries = Vec::with_capacity(corpus.len());
        for path in corpus {
            let label = oracle.assign(&path)?;
            let index = labels.iter().position(|l| *l == label).ok_or_else(|| {
                ClassifierError::config(format!("label {label} is not in the vocabulary"))
            })?;
            entries.push((path, index));
        }

        let scaler = PixelScaler::fit(BatchSource::from_entries(
            entries.clone(),
            None,
            DEFAULT_BATCH_SIZE,
        ));
        let prepared: Vec<PreparedBatch> =
            BatchSource::from_entries(entries, None, DEFAULT_BATCH_SIZE)
                .map(|b| b.prepare(&scaler))
                .collect();
        if prepared.iter().map(PreparedBatch::len).sum::<usize>() == 0 {
            return Err(ClassifierError::EvaluationSetup {
                message: "no evaluation records could be loaded".into(),
            });
        }

        let stats = self.artifact.model.evaluate(prepared.into_iter(), match_index);
        info!("\n{stats}");
        info!(labels = ?labels, "labels");
        Ok(stats)
    }
}
