//! Aggregate evaluation statistics.
//!
//! Binary confusion counts accumulated against the match class, with the
//! usual derived metrics and a printable summary block.

use std::fmt;

/// Accuracy-style statistics for one evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationStats {
    /// Records whose predicted class matched the actual class.
    pub correct: usize,
    /// Total records evaluated.
    pub total: usize,
    /// Match-class records predicted as match.
    pub true_positives: usize,
    /// Non-match records predicted as match.
    pub false_positives: usize,
    /// Non-match records predicted as non-match.
    pub true_negatives: usize,
    /// Match-class records predicted as non-match.
    pub false_negatives: usize,
}

impl EvaluationStats {
    /// Records one prediction against the ground truth.
    ///
    /// `match_index` identifies the positive class in the label vocabulary.
    pub fn record(&mut self, predicted: usize, actual: usize, match_index: usize) {
        self.total += 1;
        if predicted == actual {
            self.correct += 1;
        }
        match (actual == match_index, predicted == match_index) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_negatives += 1,
            (false, true) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
        }
    }

    /// Fraction of records predicted correctly, in [0,1].
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }

    /// Fraction of predicted matches that were actual matches.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Fraction of actual matches that were predicted as matches.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for EvaluationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========================Evaluation========================")?;
        writeln!(f, " samples:   {}", self.total)?;
        writeln!(f, " accuracy:  {:.4}", self.accuracy())?;
        writeln!(f, " precision: {:.4}", self.precision())?;
        writeln!(f, " recall:    {:.4}", self.recall())?;
        writeln!(f, " f1:        {:.4}", self.f1())?;
        writeln!(
            f,
            " confusion: tp={} fp={} tn={} fn={}",
            self.true_positives, self.false_positives, self.true_negatives, self.false_negatives
        )?;
        write!(f, "==========================================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_from_confusion_counts() {
        let mut stats = EvaluationStats::default();
        // match class = index 1.
        stats.record(1, 1, 1); // tp
        stats.record(1, 0, 1); // fp
        stats.record(0, 0, 1); // tn
        stats.record(0, 1, 1); // fn

        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct, 2);
        assert!((stats.accuracy() - 0.5).abs() < 1e-12);
        assert!((stats.precision() - 0.5).abs() < 1e-12);
        assert!((stats.recall() - 0.5).abs() < 1e-12);
        assert!((stats.f1() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_stats_do_not_divide_by_zero() {
        let stats = EvaluationStats::default();
        assert_eq!(stats.accuracy(), 0.0);
        assert_eq!(stats.precision(), 0.0);
        assert_eq!(stats.f1(), 0.0);
    }

    #[test]
    fn display_includes_the_headline_numbers() {
        let mut stats = EvaluationStats::default();
        stats.record(1, 1, 1);
        let rendered = stats.to_string();
        assert!(rendered.contains("samples:   1"));
        assert!(rendered.contains("accuracy:  1.0000"));
    }
}
