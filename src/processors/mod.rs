//! Pixel processing applied between decoding and the model.

pub mod normalization;

pub use normalization::PixelScaler;
