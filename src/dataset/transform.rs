//! Declarative image transforms used for training augmentation.
//!
//! Each transform is a pure function over one record's pixel tensor; a
//! transform applied to the train partition yields one complete additional
//! training pass without touching the partition's path list or the files
//! on disk. Transforms are never composed into a single pass.

use crate::core::Tensor3D;

/// A pure, per-record pixel transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransform {
    /// Mirrors the image around its vertical axis.
    MirrorHorizontal,
}

impl ImageTransform {
    /// Applies the transform to one pixel tensor, producing a new tensor.
    pub fn apply(&self, pixels: &Tensor3D) -> Tensor3D {
        match self {
            ImageTransform::MirrorHorizontal => {
                let (_, width, _) = pixels.dim();
                Tensor3D::from_shape_fn(pixels.raw_dim(), |(y, x, c)| {
                    pixels[[y, width - 1 - x, c]]
                })
            }
        }
    }

    /// Human-readable transform name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ImageTransform::MirrorHorizontal => "mirror-horizontal",
        }
    }
}

/// An ordered sequence of transforms driving augmentation passes.
///
/// The un-transformed pass always runs first; each configured transform
/// then drives one full extra pass over the same, unmodified partition.
#[derive(Debug, Clone, Default)]
pub struct AugmentationPipeline {
    transforms: Vec<ImageTransform>,
}

impl AugmentationPipeline {
    /// A pipeline with the given transforms, in pass order.
    pub fn new(transforms: Vec<ImageTransform>) -> Self {
        Self { transforms }
    }

    /// The pipeline used for training by default: one mirrored pass.
    pub fn standard() -> Self {
        Self::new(vec![ImageTransform::MirrorHorizontal])
    }

    /// The transforms in pass order, identity pass first (`None`).
    pub fn passes(&self) -> impl Iterator<Item = Option<ImageTransform>> + '_ {
        std::iter::once(None).chain(self.transforms.iter().copied().map(Some))
    }

    /// Total number of passes, including the identity pass.
    pub fn pass_count(&self) -> usize {
        self.transforms.len() + 1
    }
}
