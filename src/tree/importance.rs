//! Feature Importance
//!
//! Gain-based ("mean decrease in impurity") importance for a single tree.
//! Each internal node adds `gain * weighted_count` to the feature it splits
//! on, and the totals are normalized to sum to one. Averaging across the
//! trees of an ensemble is left to the caller.
use crate::errors::TreeError;
use crate::node::Node;

/// Importance of each of the `num_features` features for the tree rooted at `root`.
///
/// Features that are never split on get `0.0`. If no split has positive
/// weighted gain (for example a tree that is a single leaf) every importance is `0.0`.
/// Weighted gains that overflow, alone or summed, are reported as `InvalidImpurityStats`.
pub fn compute_feature_importances(root: &Node, num_features: usize) -> Result<Vec<f64>, TreeError> {
    if num_features == 0 {
        return Err(TreeError::InvalidNumFeatures(num_features));
    }
    let mut importances = vec![0.0; num_features];
    accumulate_gain(root, &mut importances)?;
    let total: f64 = importances.iter().sum();
    if !total.is_finite() {
        return Err(TreeError::InvalidImpurityStats(format!(
            "total weighted gain {} is not finite",
            total
        )));
    }
    normalize_in_place(&mut importances);
    Ok(importances)
}

/// Add the weighted gain of every internal node below `node` to the slot of its split feature.
pub fn accumulate_gain(node: &Node, importances: &mut [f64]) -> Result<(), TreeError> {
    if let Node::Internal(n) = node {
        let feature = n.split.feature_index();
        let n_slots = importances.len();
        let slot = importances
            .get_mut(feature)
            .ok_or(TreeError::SplitFeatureOutOfRange(feature, n_slots))?;
        let contribution = n.stats.gain * n.stats.weighted_count();
        if !contribution.is_finite() {
            return Err(TreeError::InvalidImpurityStats(format!(
                "weighted gain {} * {} on feature {} is not finite",
                n.stats.gain,
                n.stats.weighted_count(),
                feature
            )));
        }
        *slot += contribution;
        accumulate_gain(&n.left, importances)?;
        accumulate_gain(&n.right, importances)?;
    }
    Ok(())
}

/// Scale `values` to sum to one, or set them all to zero when the total is not positive.
pub fn normalize_in_place(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    } else {
        values.iter_mut().for_each(|v| *v = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impurity::{ImpurityCalculator, ImpurityStats};
    use crate::split::Split;

    fn leaf() -> Node {
        Node::leaf(0.0, ImpurityStats::leaf(ImpurityCalculator::variance(1.0, 0.0, 0.0)))
    }

    fn split(feature: usize, gain: f64, count: f64, left: Node, right: Node) -> Node {
        Node::internal(
            0.0,
            ImpurityStats::new(ImpurityCalculator::variance(count, 0.0, count), gain),
            Split::continuous(feature, 0.0),
            left,
            right,
        )
    }

    #[test]
    fn test_weighted_by_count() {
        // Root: gain 1 over 10 rows. Child: gain 4 over 5 rows.
        let tree = split(0, 1.0, 10.0, leaf(), split(1, 4.0, 5.0, leaf(), leaf()));
        let importances = compute_feature_importances(&tree, 3).unwrap();
        assert!((importances[0] - 10.0 / 30.0).abs() < 1e-12);
        assert!((importances[1] - 20.0 / 30.0).abs() < 1e-12);
        assert_eq!(importances[2], 0.0);
    }

    #[test]
    fn test_repeated_feature_sums() {
        let tree = split(1, 2.0, 4.0, split(1, 1.0, 2.0, leaf(), leaf()), split(0, 1.0, 2.0, leaf(), leaf()));
        let importances = compute_feature_importances(&tree, 2).unwrap();
        assert!((importances[1] - 10.0 / 12.0).abs() < 1e-12);
        assert!((importances[0] - 2.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_gain_is_all_zero() {
        let tree = split(0, 0.0, 10.0, leaf(), leaf());
        assert_eq!(compute_feature_importances(&tree, 2).unwrap(), vec![0.0, 0.0]);
        assert_eq!(compute_feature_importances(&leaf(), 4).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn test_preconditions() {
        assert_eq!(
            compute_feature_importances(&leaf(), 0),
            Err(TreeError::InvalidNumFeatures(0))
        );
        let tree = split(0, 1.0, 1.0, leaf(), split(5, 1.0, 1.0, leaf(), leaf()));
        assert_eq!(
            compute_feature_importances(&tree, 2),
            Err(TreeError::SplitFeatureOutOfRange(5, 2))
        );
    }

    #[test]
    fn test_overflowing_gain() {
        let tree = split(0, 1e200, 1e200, leaf(), split(1, 1e200, 1e200, leaf(), leaf()));
        assert!(matches!(
            compute_feature_importances(&tree, 2),
            Err(TreeError::InvalidImpurityStats(_))
        ));
        // Each contribution is finite, their sum is not.
        let tree = split(0, 1e154, 1e154, leaf(), split(0, 1e154, 1e154, leaf(), leaf()));
        assert!(matches!(
            compute_feature_importances(&tree, 1),
            Err(TreeError::InvalidImpurityStats(_))
        ));
    }

    #[test]
    fn test_normalize_in_place() {
        let mut v = vec![1.0, 3.0, 0.0];
        normalize_in_place(&mut v);
        assert_eq!(v, vec![0.25, 0.75, 0.0]);
        let mut z = vec![0.0, 0.0];
        normalize_in_place(&mut z);
        assert_eq!(z, vec![0.0, 0.0]);
    }
}
