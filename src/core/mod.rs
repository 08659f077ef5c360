//! Core primitives of the classification pipeline.
//!
//! This module contains the pieces everything else builds on:
//! - Error handling ([`ClassifierError`] and the crate-wide [`Result`] alias)
//! - Pipeline defaults ([`constants`])
//! - Batch primitives ([`ImageRecord`], [`Batch`], [`PreparedBatch`] and the
//!   tensor type aliases)

pub mod batch;
pub mod constants;
pub mod errors;

pub use batch::{Batch, ImageRecord, PreparedBatch, Tensor2D, Tensor3D, Tensor4D};
pub use constants::*;
pub use errors::{ClassifierError, Result};
