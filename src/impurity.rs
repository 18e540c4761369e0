//! Impurity
//!
//! Per-node label statistics collected while the tree was trained. They are
//! read back here to report node impurity, the split gain, and the weight of
//! training instances that reached the node.
use crate::errors::TreeError;

/// Sufficient statistics of the labels reaching a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpurityCalculator {
    /// Regression statistics: weighted count, weighted sum and weighted sum of squares.
    Variance { count: f64, sum: f64, sum_squares: f64 },
    /// Classification statistics: weighted count per class, impurity measured as Gini.
    Gini { counts: Vec<f64> },
    /// Classification statistics: weighted count per class, impurity measured as entropy.
    Entropy { counts: Vec<f64> },
}

impl ImpurityCalculator {
    pub fn variance(count: f64, sum: f64, sum_squares: f64) -> Self {
        ImpurityCalculator::Variance { count, sum, sum_squares }
    }

    /// Build variance statistics from raw labels, each with unit weight.
    pub fn variance_from_labels(labels: &[f64]) -> Self {
        let (sum, sum_squares) = labels.iter().fold((0.0, 0.0), |(s, sq), y| (s + y, sq + y * y));
        ImpurityCalculator::Variance {
            count: labels.len() as f64,
            sum,
            sum_squares,
        }
    }

    pub fn gini(counts: Vec<f64>) -> Self {
        ImpurityCalculator::Gini { counts }
    }

    pub fn entropy(counts: Vec<f64>) -> Self {
        ImpurityCalculator::Entropy { counts }
    }

    /// Impurity of the node described by these statistics.
    pub fn calculate(&self) -> f64 {
        match self {
            ImpurityCalculator::Variance { count, sum, sum_squares } => {
                if *count == 0.0 {
                    return 0.0;
                }
                // Cancellation can leave a tiny negative remainder.
                ((sum_squares - sum * sum / count) / count).max(0.0)
            }
            ImpurityCalculator::Gini { counts } => {
                let total: f64 = counts.iter().sum();
                if total == 0.0 {
                    return 0.0;
                }
                1.0 - counts.iter().map(|c| (c / total) * (c / total)).sum::<f64>()
            }
            ImpurityCalculator::Entropy { counts } => {
                let total: f64 = counts.iter().sum();
                if total == 0.0 {
                    return 0.0;
                }
                counts
                    .iter()
                    .filter(|c| **c > 0.0)
                    .map(|c| {
                        let p = c / total;
                        -p * p.log2()
                    })
                    .sum()
            }
        }
    }

    /// Weighted number of training instances.
    pub fn count(&self) -> f64 {
        match self {
            ImpurityCalculator::Variance { count, .. } => *count,
            ImpurityCalculator::Gini { counts } | ImpurityCalculator::Entropy { counts } => counts.iter().sum(),
        }
    }

    /// Prediction implied by the statistics: the mean label for regression,
    /// the majority class index for classification.
    pub fn predict(&self) -> f64 {
        match self {
            ImpurityCalculator::Variance { count, sum, .. } => {
                if *count == 0.0 {
                    0.0
                } else {
                    sum / count
                }
            }
            ImpurityCalculator::Gini { counts } | ImpurityCalculator::Entropy { counts } => counts
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, max), (i, c)| {
                    if *c > max {
                        (i, *c)
                    } else {
                        (best, max)
                    }
                })
                .0 as f64,
        }
    }

    /// Share of the weight belonging to `label`. Always `None` for regression statistics.
    pub fn prob(&self, label: usize) -> Option<f64> {
        match self {
            ImpurityCalculator::Variance { .. } => None,
            ImpurityCalculator::Gini { counts } | ImpurityCalculator::Entropy { counts } => {
                let total: f64 = counts.iter().sum();
                let c = counts.get(label).copied().unwrap_or(0.0);
                if total == 0.0 {
                    Some(0.0)
                } else {
                    Some(c / total)
                }
            }
        }
    }

    fn validate(&self) -> Result<(), TreeError> {
        match self {
            ImpurityCalculator::Variance { count, sum, sum_squares } => {
                if !count.is_finite() || *count < 0.0 {
                    return Err(TreeError::InvalidImpurityStats(format!(
                        "variance count must be finite and non-negative, found {}",
                        count
                    )));
                }
                if !sum.is_finite() || !sum_squares.is_finite() || *sum_squares < 0.0 {
                    return Err(TreeError::InvalidImpurityStats(format!(
                        "variance sums must be finite with a non-negative sum of squares, found sum={} sum_squares={}",
                        sum, sum_squares
                    )));
                }
            }
            ImpurityCalculator::Gini { counts } | ImpurityCalculator::Entropy { counts } => {
                if let Some(c) = counts.iter().find(|c| !c.is_finite() || **c < 0.0) {
                    return Err(TreeError::InvalidImpurityStats(format!(
                        "class counts must be finite and non-negative, found {}",
                        c
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Statistics attached to every node of a trained tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpurityStats {
    /// Impurity at this node.
    pub impurity: f64,
    /// Impurity reduction of the split below this node, zero for leaves.
    pub gain: f64,
    pub calculator: ImpurityCalculator,
}

impl ImpurityStats {
    /// Statistics for an internal node whose split achieved `gain`.
    pub fn new(calculator: ImpurityCalculator, gain: f64) -> Self {
        ImpurityStats {
            impurity: calculator.calculate(),
            gain,
            calculator,
        }
    }

    /// Statistics for a leaf, which has no split and therefore no gain.
    pub fn leaf(calculator: ImpurityCalculator) -> Self {
        ImpurityStats::new(calculator, 0.0)
    }

    /// Weighted number of training instances that reached the node.
    pub fn weighted_count(&self) -> f64 {
        self.calculator.count()
    }

    pub fn calculate(&self) -> f64 {
        self.calculator.calculate()
    }

    pub fn predict(&self) -> f64 {
        self.calculator.predict()
    }

    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(TreeError::InvalidImpurityStats(format!(
                "gain must be finite and non-negative, found {}",
                self.gain
            )));
        }
        if !self.impurity.is_finite() || self.impurity < 0.0 {
            return Err(TreeError::InvalidImpurityStats(format!(
                "impurity must be finite and non-negative, found {}",
                self.impurity
            )));
        }
        self.calculator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_variance_from_labels() {
        let calc = ImpurityCalculator::variance_from_labels(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(calc.count(), 4.0);
        assert!(close(calc.predict(), 2.5));
        assert!(close(calc.calculate(), 1.25));
    }

    #[test]
    fn test_variance_empty_and_constant() {
        assert_eq!(ImpurityCalculator::variance(0.0, 0.0, 0.0).calculate(), 0.0);
        assert_eq!(ImpurityCalculator::variance(0.0, 0.0, 0.0).predict(), 0.0);
        let calc = ImpurityCalculator::variance_from_labels(&[0.1; 7]);
        assert!(calc.calculate() >= 0.0);
        assert!(calc.calculate() < 1e-12);
    }

    #[test]
    fn test_gini() {
        let calc = ImpurityCalculator::gini(vec![3.0, 1.0]);
        assert!(close(calc.calculate(), 0.375));
        assert_eq!(calc.predict(), 0.0);
        assert_eq!(calc.count(), 4.0);
        assert_eq!(calc.prob(1), Some(0.25));
        assert_eq!(calc.prob(7), Some(0.0));
        assert_eq!(ImpurityCalculator::gini(vec![0.0, 0.0]).calculate(), 0.0);
    }

    #[test]
    fn test_entropy() {
        let calc = ImpurityCalculator::entropy(vec![2.0, 2.0]);
        assert!(close(calc.calculate(), 1.0));
        let pure = ImpurityCalculator::entropy(vec![0.0, 5.0]);
        assert_eq!(pure.calculate(), 0.0);
        assert_eq!(pure.predict(), 1.0);
    }

    #[test]
    fn test_stats() {
        let stats = ImpurityStats::new(ImpurityCalculator::variance_from_labels(&[1.0, 3.0]), 0.5);
        assert!(close(stats.impurity, 1.0));
        assert_eq!(stats.calculate(), stats.impurity);
        assert_eq!(stats.weighted_count(), 2.0);
        assert!(stats.validate().is_ok());

        let leaf = ImpurityStats::leaf(ImpurityCalculator::gini(vec![1.0]));
        assert_eq!(leaf.gain, 0.0);
        assert_eq!(leaf.calculator.prob(0), Some(1.0));
    }

    #[test]
    fn test_stats_validation() {
        let calc = ImpurityCalculator::variance(2.0, 1.0, 1.0);
        assert!(ImpurityStats::new(calc.clone(), -0.1).validate().is_err());
        assert!(ImpurityStats::new(calc.clone(), f64::NAN).validate().is_err());
        assert!(ImpurityStats::leaf(ImpurityCalculator::variance(-1.0, 0.0, 0.0))
            .validate()
            .is_err());
        assert!(ImpurityStats::leaf(ImpurityCalculator::gini(vec![1.0, -2.0]))
            .validate()
            .is_err());
        assert!(ImpurityStats::leaf(calc).validate().is_ok());
    }
}
