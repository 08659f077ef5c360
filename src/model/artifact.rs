//! Persisted model artifacts.
//!
//! An artifact is the serialized form of a trained model together with the
//! label vocabulary it was trained against and the training-fitted pixel
//! scaler. Written once at the end of training, read once at classifier or
//! evaluator startup. The payload carries a version header and loading
//! rejects a mismatch rather than misreading a stale file.

use crate::core::{ClassifierError, Result};
use crate::processors::PixelScaler;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Schema version written to and expected from artifact files.
pub const ARTIFACT_VERSION: u32 = 1;

/// Deterministic binary codec shared by save and load.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_little_endian()
}

/// A trained model plus everything inference needs to reproduce training
/// conditions: the sorted label vocabulary, the positive-class index, and
/// the training-fitted scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact<M> {
    /// Sorted label vocabulary the model was trained against.
    pub labels: Vec<String>,
    /// Index of the match (positive) class within `labels`.
    pub match_index: usize,
    /// Pixel scaler fit on the training subset; never refit at inference.
    pub scaler: PixelScaler,
    /// The trained model parameters.
    pub model: M,
}

impl<M> ModelArtifact<M>
where
    M: Serialize + DeserializeOwned,
{
    /// Writes the artifact to disk, version header first.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Artifact`] when the file cannot be
    /// created or the payload cannot be encoded.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ClassifierError::artifact(path, e))?;
        let mut writer = BufWriter::new(file);
        codec()
            .serialize_into(&mut writer, &ARTIFACT_VERSION)
            .map_err(|e| ClassifierError::artifact(path, e))?;
        codec()
            .serialize_into(&mut writer, self)
            .map_err(|e| ClassifierError::artifact(path, e))?;
        writer.flush().map_err(|e| ClassifierError::artifact(path, e))?;
        Ok(())
    }

    /// Reads an artifact back from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Artifact`] for missing or undecodable
    /// files and [`ClassifierError::VersionMismatch`] when the header does
    /// not match [`ARTIFACT_VERSION`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ClassifierError::artifact(path, e))?;
        let mut reader = BufReader::new(file);
        let version: u32 = codec()
            .deserialize_from(&mut reader)
            .map_err(|e| ClassifierError::artifact(path, e))?;
        if version != ARTIFACT_VERSION {
            return Err(ClassifierError::VersionMismatch {
                expected: ARTIFACT_VERSION,
                found: version,
            });
        }
        codec()
            .deserialize_from(&mut reader)
            .map_err(|e| ClassifierError::artifact(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(value: u8) -> ModelArtifact<Vec<u8>> {
        ModelArtifact {
            labels: vec!["beach".into(), "trail".into()],
            match_index: 1,
            scaler: PixelScaler::new(0.0, 255.0),
            model: vec![value; 4],
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        artifact(7).save(&path).unwrap();

        let loaded = ModelArtifact::<Vec<u8>>::load(&path).unwrap();
        assert_eq!(loaded.labels, vec!["beach", "trail"]);
        assert_eq!(loaded.match_index, 1);
        assert_eq!(loaded.model, vec![7; 4]);
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let err = ModelArtifact::<Vec<u8>>::load(Path::new("/no/such/model.bin")).unwrap_err();
        assert!(matches!(err, ClassifierError::Artifact { .. }));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let file = File::create(&path).unwrap();
        let mut writer = BufWriter::new(file);
        codec().serialize_into(&mut writer, &99u32).unwrap();
        codec().serialize_into(&mut writer, &artifact(1)).unwrap();
        writer.flush().unwrap();

        let err = ModelArtifact::<Vec<u8>>::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::VersionMismatch {
                expected: ARTIFACT_VERSION,
                found: 99
            }
        ));
    }

    #[test]
    fn truncated_file_is_an_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, [1u8, 0, 0]).unwrap();
        let err = ModelArtifact::<Vec<u8>>::load(&path).unwrap_err();
        assert!(matches!(err, ClassifierError::Artifact { .. }));
    }
}
