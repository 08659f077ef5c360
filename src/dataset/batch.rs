//! Lazy, restartable batched loading of labeled images.
//!
//! A [`BatchSource`] walks a partition's entries in deterministic order,
//! decoding fixed-size groups of images into [`Batch`]es. Records inside a
//! batch decode in parallel but always reassemble in partition order, so a
//! fixed seed reproduces the exact batch membership of a previous run. A
//! file that fails to decode is logged and skipped; it never aborts the
//! pass.

use crate::core::{Batch, ImageRecord};
use crate::dataset::{ImageTransform, Partition};
use crate::utils::load_pixels;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::error;

/// A single-pass iterator of batches over a set of labeled paths.
///
/// Finite and restartable: iterating consumes the source, and constructing
/// it again from the same partition reopens from the start with identical
/// ordering.
#[derive(Debug)]
pub struct BatchSource {
    entries: Vec<(PathBuf, usize)>,
    transform: Option<ImageTransform>,
    batch_size: usize,
    cursor: usize,
}

impl BatchSource {
    /// Batches over a balanced partition, optionally transforming each
    /// record's pixels for an augmentation pass.
    pub fn new(
        partition: &Partition,
        transform: Option<ImageTransform>,
        batch_size: usize,
    ) -> Self {
        Self::from_entries(partition.entries(), transform, batch_size)
    }

    /// Batches over explicit (path, label index) entries. Used for
    /// evaluation sets, which are not balanced partitions.
    pub fn from_entries(
        entries: Vec<(PathBuf, usize)>,
        transform: Option<ImageTransform>,
        batch_size: usize,
    ) -> Self {
        Self {
            entries,
            transform,
            batch_size: batch_size.max(1),
            cursor: 0,
        }
    }

    /// Number of entries left to draw, decodable or not.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    fn load_chunk(&self, chunk: &[(PathBuf, usize)]) -> Vec<ImageRecord> {
        // Parallel decode, order preserved by the indexed collect.
        chunk
            .par_iter()
            .map(|(path, label)| match load_pixels(path) {
                Ok(pixels) => {
                    let pixels = match &self.transform {
                        Some(t) => t.apply(&pixels),
                        None => pixels,
                    };
                    Some(ImageRecord {
                        path: path.clone(),
                        pixels,
                        label: *label,
                    })
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "skipping undecodable image");
                    None
                }
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Iterator for BatchSource {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        while self.cursor < self.entries.len() {
            let end = (self.cursor + self.batch_size).min(self.entries.len());
            let chunk = &self.entries[self.cursor..end];
            self.cursor = end;

            let records = self.load_chunk(chunk);
            if !records.is_empty() {
                return Some(Batch { records });
            }
            // Every record in the chunk failed to decode; fall through to
            // the next chunk rather than yielding an empty batch.
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH};
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, Rgb(color))
            .save(&path)
            .unwrap();
        path
    }

    fn entries(dir: &Path, count: usize) -> Vec<(PathBuf, usize)> {
        (0..count)
            .map(|i| {
                let path = write_png(dir, &format!("img_{i:02}.png"), [i as u8, 0, 0]);
                (path, i % 2)
            })
            .collect()
    }

    #[test]
    fn batches_are_fixed_size_with_a_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let source = BatchSource::from_entries(entries(dir.path(), 7), None, 3);
        let sizes: Vec<usize> = source.map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn records_keep_entry_order_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let entries = entries(dir.path(), 4);
        let expected: Vec<_> = entries.clone();
        let source = BatchSource::from_entries(entries, None, 4);
        let batch = source.into_iter().next().unwrap();
        for (record, (path, label)) in batch.records.iter().zip(&expected) {
            assert_eq!(&record.path, path);
            assert_eq!(&record.label, label);
            assert_eq!(
                record.pixels.shape(),
                &[IMAGE_HEIGHT as usize, IMAGE_WIDTH as usize, IMAGE_CHANNELS]
            );
        }
    }

    #[test]
    fn undecodable_records_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut entries = entries(dir.path(), 3);
        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"definitely not a png").unwrap();
        entries.insert(1, (corrupt, 1));

        let source = BatchSource::from_entries(entries, None, 4);
        let total: usize = source.map(|b| b.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn fully_undecodable_chunks_are_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"nope").unwrap();
        let good = write_png(dir.path(), "good.png", [1, 2, 3]);

        let source = BatchSource::from_entries(vec![(corrupt, 0), (good, 1)], None, 1);
        let batches: Vec<Batch> = source.collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records[0].label, 1);
    }

    #[test]
    fn remaining_counts_down_as_batches_are_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = BatchSource::from_entries(entries(dir.path(), 5), None, 2);
        assert_eq!(source.remaining(), 5);
        source.next().unwrap();
        assert_eq!(source.remaining(), 3);
        source.next().unwrap();
        source.next().unwrap();
        assert_eq!(source.remaining(), 0);
        assert!(source.next().is_none());
    }

    #[test]
    fn restarting_reproduces_the_same_batches() {
        let dir = tempfile::tempdir().unwrap();
        let entries = entries(dir.path(), 5);

        let first: Vec<Vec<PathBuf>> = BatchSource::from_entries(entries.clone(), None, 2)
            .map(|b| b.records.into_iter().map(|r| r.path).collect())
            .collect();
        let second: Vec<Vec<PathBuf>> = BatchSource::from_entries(entries, None, 2)
            .map(|b| b.records.into_iter().map(|r| r.path).collect())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn transform_applies_to_every_record_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let img = RgbImage::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |x, _| Rgb([x as u8, 0, 0]));
        img.save(&path).unwrap();
        let bytes_before = std::fs::read(&path).unwrap();

        let plain = BatchSource::from_entries(vec![(path.clone(), 0)], None, 1)
            .next()
            .unwrap();
        let mirrored = BatchSource::from_entries(
            vec![(path.clone(), 0)],
            Some(ImageTransform::MirrorHorizontal),
            1,
        )
        .next()
        .unwrap();

        assert_ne!(plain.records[0].pixels, mirrored.records[0].pixels);
        assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
    }
}
