//! Default parameters shared across the pipeline.

/// Height every decoded image is resized to, in pixels.
pub const IMAGE_HEIGHT: u32 = 100;

/// Width every decoded image is resized to, in pixels.
pub const IMAGE_WIDTH: u32 = 100;

/// Number of color channels in a decoded pixel tensor.
pub const IMAGE_CHANNELS: usize = 3;

/// Flattened feature length of one decoded image.
pub const FEATURE_LEN: usize = (IMAGE_HEIGHT as usize) * (IMAGE_WIDTH as usize) * IMAGE_CHANNELS;

/// Number of classes the pipeline distinguishes.
pub const NUM_LABELS: usize = 2;

/// Default number of records per training batch.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Default fraction of each balanced label group that goes to training.
pub const DEFAULT_TRAINING_RATIO: f64 = 0.8;

/// Default seed for the process-wide pseudo-random source.
pub const DEFAULT_SEED: u64 = 42;

/// File extensions accepted when listing a corpus directory.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
