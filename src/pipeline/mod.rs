//! Model lifecycle drivers: training, single-image inference, and
//! whole-directory evaluation.

pub mod builder;
pub mod classifier;
pub mod evaluator;

pub use builder::{BuildState, ModelBuilder};
pub use classifier::Classifier;
pub use evaluator::Evaluator;
