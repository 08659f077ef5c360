//! Balanced, deterministic train/test splitting.
//!
//! Groups a corpus by oracle-assigned label, shuffles each group with a
//! seeded random source, equalizes group sizes by dropping surplus
//! majority-class paths, and cuts every group at the training ratio. The
//! same corpus, oracle, ratio and seed always produce bit-identical
//! partitions regardless of the order the corpus listing arrived in.

use crate::core::{ClassifierError, Result};
use crate::dataset::LabelOracle;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// One side of a balanced split: label name to ordered file paths.
///
/// Every label's path list has the same length within a partition, and the
/// train and test partitions produced by one split never share a path.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    groups: BTreeMap<String, Vec<PathBuf>>,
}

impl Partition {
    /// The sorted label vocabulary of this partition.
    pub fn labels(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Paths carrying the given label, in partition order.
    pub fn paths_for(&self, label: &str) -> &[PathBuf] {
        self.groups.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of paths across all labels.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// True when the partition holds no paths.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All paths with their label index into the sorted vocabulary,
    /// interleaved round-robin across labels.
    ///
    /// Groups are equal-sized after balancing, so the round-robin order is
    /// deterministic and mixes classes evenly through every batch without
    /// consuming additional randomness.
    pub fn entries(&self) -> Vec<(PathBuf, usize)> {
        let group_len = self.groups.values().map(Vec::len).max().unwrap_or(0);
        let mut entries = Vec::with_capacity(self.len());
        for i in 0..group_len {
            for (label_idx, paths) in self.groups.values().enumerate() {
                if let Some(path) = paths.get(i) {
                    entries.push((path.clone(), label_idx));
                }
            }
        }
        entries
    }

    /// True when any of the partition's groups contains the path.
    pub fn contains(&self, path: &PathBuf) -> bool {
        self.groups.values().any(|paths| paths.contains(path))
    }
}

/// Splits a corpus into balanced, disjoint train and test partitions.
///
/// The corpus listing is sorted before grouping so directory iteration
/// order cannot influence the outcome; all randomness comes from `rng`.
/// Surplus examples in larger label groups are dropped, not resampled,
/// and the training side of each group takes `floor(group_len * ratio)`.
///
/// # Errors
///
/// Returns [`ClassifierError::Config`] when `ratio` is outside (0,1), the
/// corpus produces fewer than two distinct labels, or the balanced groups
/// are too small to populate both sides of the split.
pub fn balanced_split(
    corpus: Vec<PathBuf>,
    oracle: &LabelOracle,
    ratio: f64,
    rng: &mut StdRng,
) -> Result<(Partition, Partition)> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(ClassifierError::config(format!(
            "training ratio must be in (0,1), got {ratio}"
        )));
    }

    let mut sorted = corpus;
    sorted.sort();

    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in sorted {
        let label = oracle.assign(&path)?;
        groups.entry(label).or_default().push(path);
    }

    if groups.len() < 2 {
        return Err(ClassifierError::config(format!(
            "need at least two distinct labels to train, found {}: [{}]",
            groups.len(),
            groups.keys().cloned().collect::<Vec<_>>().join(", ")
        )));
    }

    let min_len = groups.values().map(Vec::len).min().unwrap_or(0);
    if min_len == 0 {
        return Err(ClassifierError::config(
            "a label group is empty; cannot balance the corpus",
        ));
    }

    let train_len = (min_len as f64 * ratio).floor() as usize;
    let test_len = min_len - train_len;
    if train_len == 0 || test_len == 0 {
        return Err(ClassifierError::config(format!(
            "balanced group size {min_len} at ratio {ratio} leaves an empty partition \
             ({train_len} train / {test_len} test)"
        )));
    }

    let mut train = Partition::default();
    let mut test = Partition::default();
    for (label, mut paths) in groups {
        let dropped = paths.len() - min_len;
        if dropped > 0 {
            debug!(label = %label, dropped, "dropping surplus examples to balance classes");
        }
        paths.shuffle(rng);
        paths.truncate(min_len);
        let test_side = paths.split_off(train_len);
        train.groups.insert(label.clone(), paths);
        test.groups.insert(label, test_side);
    }

    info!(
        labels = train.groups.len(),
        train = train.len(),
        test = test.len(),
        "balanced split complete"
    );
    Ok((train, test))
}
