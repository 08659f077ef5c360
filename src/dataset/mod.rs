//! The data pipeline: corpus listing, labeling, splitting, augmentation,
//! and batched loading.
//!
//! Everything here is deterministic under a fixed seed: the corpus listing
//! is sorted, the splitter's shuffles come from an explicitly passed seeded
//! source, and batch membership follows partition order.

pub mod batch;
pub mod labels;
pub mod metadata;
pub mod split;
pub mod transform;

pub use batch::BatchSource;
pub use labels::LabelOracle;
pub use split::{balanced_split, Partition};
pub use transform::{AugmentationPipeline, ImageTransform};

use crate::core::{Result, ALLOWED_EXTENSIONS};
use std::path::{Path, PathBuf};

/// Lists every image file under a directory tree, sorted for determinism.
///
/// Files are matched by extension (case-insensitive) against the allowed
/// image formats; everything else is ignored.
///
/// # Errors
///
/// Returns an I/O error when a directory in the tree cannot be read.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    collect_images(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_images(&path, out)?;
        } else if has_image_extension(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            let lower = e.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&lower.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_images_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("trail")).unwrap();
        std::fs::create_dir(dir.path().join("beach")).unwrap();
        for name in ["trail/b.jpg", "trail/a.JPG", "beach/c.png", "beach/notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let paths = list_images(dir.path()).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, vec!["beach/c.png", "trail/a.JPG", "trail/b.jpg"]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = list_images(Path::new("/definitely/missing")).unwrap_err();
        assert!(matches!(err, crate::core::ClassifierError::Io(_)));
    }
}
