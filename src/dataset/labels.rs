//! Label oracles: the components deciding an image's ground-truth class.
//!
//! Two variants of one capability, per the layout of the corpora this crate
//! trains on: label from the parent directory name, or label from whether
//! the embedded image description matches a target caption.

use crate::core::{ClassifierError, Result};
use crate::dataset::metadata;
use std::path::Path;
use tracing::error;

/// Assigns a ground-truth label to an image file path.
#[derive(Debug, Clone)]
pub enum LabelOracle {
    /// Label = the name of the path's immediate parent directory.
    ParentDir,
    /// Label = whether the embedded image description equals the target
    /// caption (case-insensitive). A matching description yields the
    /// lowercased target; anything else yields `"not_" + target`.
    Caption {
        /// The caption to match, as configured.
        target: String,
        /// Label produced on a match (lowercased target).
        match_label: String,
        /// Label produced otherwise.
        no_match_label: String,
    },
}

impl LabelOracle {
    /// Oracle labeling each file by its parent directory name.
    pub fn parent_dir() -> Self {
        LabelOracle::ParentDir
    }

    /// Oracle labeling each file by its embedded description.
    pub fn caption(target: impl Into<String>) -> Self {
        let target = target.into();
        let normalized = target.to_lowercase();
        LabelOracle::Caption {
            match_label: normalized.clone(),
            no_match_label: format!("not_{normalized}"),
            target,
        }
    }

    /// Assigns the label for a file path.
    ///
    /// The caption variant is fail-open: when the description cannot be
    /// extracted (corrupt file, unsupported format, I/O error) the failure
    /// is logged and the file is treated as a negative example, not an
    /// ingestion error. Corrupt inputs therefore never abort a run, at the
    /// cost of labeling them confidently negative; revisit if corrupt files
    /// become common in a corpus.
    ///
    /// # Errors
    ///
    /// The parent-directory variant returns [`ClassifierError::Config`] for
    /// a path with no named parent; the caption variant never fails.
    pub fn assign(&self, path: &Path) -> Result<String> {
        match self {
            LabelOracle::ParentDir => {
                let parent = path
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        ClassifierError::config(format!(
                            "cannot derive a label: {} has no parent directory",
                            path.display()
                        ))
                    })?;
                Ok(parent.to_lowercase())
            }
            LabelOracle::Caption {
                target,
                match_label,
                no_match_label,
            } => {
                let description = match metadata::image_description(path) {
                    Ok(d) => d,
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "couldn't extract a description");
                        None
                    }
                };
                let matches = description
                    .as_deref()
                    .is_some_and(|d| d.eq_ignore_ascii_case(target));
                Ok(if matches {
                    match_label.clone()
                } else {
                    no_match_label.clone()
                })
            }
        }
    }

    /// The label vocabulary this oracle can produce, sorted, when known
    /// up front. The parent-directory variant discovers its vocabulary
    /// from the corpus instead.
    pub fn known_labels(&self) -> Option<Vec<String>> {
        match self {
            LabelOracle::ParentDir => None,
            LabelOracle::Caption {
                match_label,
                no_match_label,
                ..
            } => {
                let mut labels = vec![match_label.clone(), no_match_label.clone()];
                labels.sort();
                Some(labels)
            }
        }
    }

    /// The positive-class label, when the oracle defines one.
    pub fn match_label(&self) -> Option<&str> {
        match self {
            LabelOracle::ParentDir => None,
            LabelOracle::Caption { match_label, .. } => Some(match_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::metadata::tests::write_jpeg_with_description;
    use std::path::PathBuf;

    #[test]
    fn parent_dir_label_is_lowercased_directory_name() {
        let oracle = LabelOracle::parent_dir();
        let label = oracle.assign(Path::new("corpus/Trail/img_001.jpg")).unwrap();
        assert_eq!(label, "trail");
    }

    #[test]
    fn parent_dir_without_parent_is_a_config_error() {
        let oracle = LabelOracle::parent_dir();
        let err = oracle.assign(&PathBuf::from("/")).unwrap_err();
        assert!(matches!(err, ClassifierError::Config { .. }));
    }

    #[test]
    fn matching_caption_yields_normalized_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_jpeg_with_description(dir.path(), "a.jpg", "Trail");
        let oracle = LabelOracle::caption("Trail");
        assert_eq!(oracle.assign(&path).unwrap(), "trail");
    }

    #[test]
    fn caption_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_jpeg_with_description(dir.path(), "a.jpg", "TRAIL");
        let oracle = LabelOracle::caption("trail");
        assert_eq!(oracle.assign(&path).unwrap(), "trail");
    }

    #[test]
    fn different_caption_yields_negative_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_jpeg_with_description(dir.path(), "b.jpg", "Beach");
        let oracle = LabelOracle::caption("Trail");
        assert_eq!(oracle.assign(&path).unwrap(), "not_trail");
    }

    #[test]
    fn unreadable_file_fails_open_to_negative_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"not an image at all").unwrap();
        let oracle = LabelOracle::caption("Trail");
        assert_eq!(oracle.assign(&path).unwrap(), "not_trail");
    }

    #[test]
    fn caption_vocabulary_is_sorted() {
        let oracle = LabelOracle::caption("Trail");
        assert_eq!(
            oracle.known_labels().unwrap(),
            vec!["not_trail".to_string(), "trail".to_string()]
        );
    }
}
