//! Single-image inference against a persisted model.

use crate::core::Result;
use crate::model::{MlpNetwork, ModelArtifact, TrainableModel};
use crate::utils::load_pixels;
use ndarray::Array1;
use std::path::Path;
use tracing::info;

/// Applies a persisted model to individual images.
///
/// The classifier normalizes with the training-fitted scaler baked into the
/// artifact; inference never refits statistics.
#[derive(Debug)]
pub struct Classifier {
    artifact: ModelArtifact<MlpNetwork>,
}

impl Classifier {
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

    /// Classifies one image, returning the match-class probability in [0,1].
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::ImageLoad`](crate::core::ClassifierError::ImageLoad)
    /// when the image cannot be decoded; for single-image inference this is
    /// fatal rather than skippable.
    pub fn classify(&self, image: &Path) -> Result<f32> {
        let pixels = load_pixels(image)?;
        let scaled = self.artifact.scaler.apply(&pixels);
        let features = Array1::from_iter(scaled.iter().copied());
        let probs = self.artifact.model.output(features.view());
        Ok(probs[self.artifact.match_index])
    }

    /// The label vocabulary the model was trained against.
    pub fn labels(&self) -> &[String] {
        &self.artifact.labels
    }

    /// The positive-class label.
    pub fn match_label(&self) -> &str {
        &self.artifact.labels[self.artifact.match_index]
    }
}
