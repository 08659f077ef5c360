//! Error types for the classification pipeline.
//!
//! This module defines the errors that can occur while building, evaluating,
//! or applying a model. The taxonomy distinguishes fatal configuration and
//! persistence failures from per-record I/O failures, which callers recover
//! from locally by skipping the offending file.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Errors produced by the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// A configuration problem: degenerate label groups, an out-of-range
    /// split ratio, a path without a parent directory, and the like.
    /// Fatal and non-retriable.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// An image failed to decode. Recovered locally when iterating a
    /// partition (the record is logged and skipped); fatal when loading the
    /// single image handed to the classifier.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Embedded metadata could not be extracted from an image file. The
    /// caption oracle maps this to the negative label instead of failing.
    #[error("metadata extraction from {path}")]
    Metadata {
        /// The file whose metadata could not be read.
        path: PathBuf,
        /// The underlying extraction error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading or writing the persisted model artifact failed. Fatal.
    #[error("model artifact at {path}")]
    Artifact {
        /// The artifact path involved.
        path: PathBuf,
        /// The underlying I/O or codec error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The artifact file was well formed but carries an incompatible schema
    /// version. Fatal.
    #[error("artifact version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// The version this build writes and reads.
        expected: u32,
        /// The version found in the file.
        found: u32,
    },

    /// The evaluation set is empty or unreadable. Fatal.
    #[error("evaluation setup: {message}")]
    EvaluationSetup {
        /// A message describing what was missing.
        message: String,
    },

    /// IO error while walking the corpus.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Creates a configuration error from anything printable.
    pub fn config(message: impl Into<String>) -> Self {
        ClassifierError::Config {
            message: message.into(),
        }
    }

    /// Creates a metadata extraction error for the given path.
    pub fn metadata(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ClassifierError::Metadata {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Creates a persistence error for the given artifact path.
    pub fn artifact(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ClassifierError::Artifact {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
