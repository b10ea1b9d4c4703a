//! Held-out Evaluation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true members in the evaluated set
    pub support: usize,
}

/// Per-class report for a binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Indexed by class label (0 = normal, 1 = fall)
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Compare true and predicted labels. Undefined ratios are reported as 0.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Self {
        let total = y_true.len().min(y_pred.len());
        let pairs = || y_true.iter().zip(y_pred).map(|(&t, &p)| (t != 0, p != 0));

        let mut classes = [ClassMetrics::default(); 2];
        for (class, metrics) in classes.iter_mut().enumerate() {
            let positive = class == 1;
            let tp = pairs().filter(|&(t, p)| t == positive && p == positive).count();
            let predicted = pairs().filter(|&(_, p)| p == positive).count();
            let actual = pairs().filter(|&(t, _)| t == positive).count();

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, actual);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            *metrics = ClassMetrics {
                precision,
                recall,
                f1,
                support: actual,
            };
        }

        let correct = pairs().filter(|&(t, p)| t == p).count();
        let accuracy = ratio(correct, total);

        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };

        let weight = |m: &ClassMetrics| m.support as f64 / total.max(1) as f64;
        let weighted = |f: fn(&ClassMetrics) -> f64| classes.iter().map(|m| f(m) * weight(m)).sum::<f64>();
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14}{:>11}{:>10}{:>10}{:>10}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (label, m) in self.classes.iter().enumerate() {
            writeln!(
                f,
                "{:>14}{:>11.2}{:>10.2}{:>10.2}{:>10}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14}{:>11}{:>10}{:>10.2}{:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14}{:>11.2}{:>10.2}{:>10.2}{:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = [0, 0, 1, 1, 1];
        let report = ClassificationReport::compute(&y, &y);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.classes[0].support, 2);
        assert_eq!(report.classes[1].support, 3);
        assert_eq!(report.classes[1].f1, 1.0);
    }

    #[test]
    fn test_mixed_predictions() {
        let y_true = [0, 0, 0, 1, 1, 1];
        let y_pred = [0, 0, 1, 1, 1, 0];
        let report = ClassificationReport::compute(&y_true, &y_pred);

        assert!((report.accuracy - 4.0 / 6.0).abs() < 1e-12);
        assert!((report.classes[1].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.classes[1].recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.macro_avg.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division_reports_zero() {
        let report = ClassificationReport::compute(&[0, 0], &[0, 0]);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].recall, 0.0);
        assert_eq!(report.classes[1].support, 0);

        let empty = ClassificationReport::compute(&[], &[]);
        assert_eq!(empty.accuracy, 0.0);
    }

    #[test]
    fn test_display_lists_classes() {
        let report = ClassificationReport::compute(&[0, 1], &[0, 1]);
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("accuracy"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("1.00"));
    }
}
