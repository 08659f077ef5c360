//! # photo-classifier
//!
//! A Rust library that trains and applies a binary image classifier telling
//! photos of a target subject apart from everything else.
//!
//! The heart of the crate is the data pipeline: a directory of raw JPEG files
//! becomes a balanced, labeled, augmented, normalized stream of training and
//! evaluation batches, and a small model lifecycle drives training,
//! evaluation, persistence, and single-image inference around that stream.
//!
//! ## Components
//!
//! - **Label oracles**: ground truth from the parent directory name, or from
//!   the embedded Exif image description compared against a target caption
//! - **Balanced splitting**: deterministic, seeded train/test partitioning
//!   with equal per-class representation
//! - **Augmentation**: declarative transforms, each yielding one extra
//!   training pass over the unmodified train partition
//! - **Batched loading**: lazy, restartable batches of decoded pixel tensors
//!   with per-record failure recovery
//! - **Normalization**: per-subset [0,1] rescaling, fit independently for
//!   train and test so statistics never leak across partitions
//! - **Model lifecycle**: train, evaluate, persist, reload, classify
//!
//! ## Modules
//!
//! * [`core`] - Error handling, defaults, and batch primitives
//! * [`dataset`] - Label oracles, corpus listing, splitting, transforms,
//!   and the batch source
//! * [`processors`] - Pixel normalization
//! * [`model`] - The trainable-model seam, the MLP backing it, evaluation
//!   statistics, and the persisted artifact
//! * [`pipeline`] - The training driver, the classifier, and the evaluator
//! * [`utils`] - Image decoding helpers and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_classifier::dataset::LabelOracle;
//! use photo_classifier::pipeline::{Classifier, ModelBuilder};
//! use std::path::Path;
//!
//! # fn main() -> photo_classifier::Result<()> {
//! // Train on a directory with one subdirectory per label.
//! let stats = ModelBuilder::new(10)
//!     .build(Path::new("images"), Path::new("model.bin"), LabelOracle::parent_dir())?;
//! println!("{stats}");
//!
//! // Reload the persisted model and classify a single photo.
//! let classifier = Classifier::load(Path::new("model.bin"))?;
//! let probability = classifier.classify(Path::new("images/trail/0001.jpg"))?;
//! println!("{:.2}% match", probability * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dataset;
pub mod model;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use crate::core::{ClassifierError, Result};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{Batch, ClassifierError, ImageRecord, PreparedBatch, Result};
    pub use crate::dataset::{
        balanced_split, list_images, AugmentationPipeline, BatchSource, ImageTransform,
        LabelOracle, Partition,
    };
    pub use crate::model::{EvaluationStats, MlpNetwork, ModelArtifact, TrainableModel};
    pub use crate::pipeline::{Classifier, Evaluator, ModelBuilder};
    pub use crate::processors::PixelScaler;
    pub use crate::utils::{init_tracing, load_pixels};
}
