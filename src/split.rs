//! Split
//!
//! The predicate an internal node uses to route a row to its left or right child.
use crate::errors::TreeError;
use hashbrown::HashSet;
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// Rows with `value <= threshold` go left.
    Continuous { feature_index: usize, threshold: f64 },
    /// Rows whose category is in `left_categories` go left.
    Categorical {
        feature_index: usize,
        left_categories: HashSet<usize>,
        num_categories: usize,
    },
}

impl Split {
    pub fn continuous(feature_index: usize, threshold: f64) -> Self {
        Split::Continuous {
            feature_index,
            threshold,
        }
    }

    pub fn categorical<I>(feature_index: usize, left_categories: I, num_categories: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Split::Categorical {
            feature_index,
            left_categories: left_categories.into_iter().collect(),
            num_categories,
        }
    }

    pub fn feature_index(&self) -> usize {
        match self {
            Split::Continuous { feature_index, .. } | Split::Categorical { feature_index, .. } => *feature_index,
        }
    }

    /// Whether a row with `value` for the split feature goes to the left child.
    ///
    /// A NaN goes right on a continuous split. On a categorical split any value
    /// that is not a non-negative whole number cannot be a left category, so it
    /// also goes right.
    pub fn should_go_left(&self, value: f64) -> bool {
        match self {
            Split::Continuous { threshold, .. } => value <= *threshold,
            Split::Categorical { left_categories, .. } => {
                value >= 0.0 && value.fract() == 0.0 && left_categories.contains(&(value as usize))
            }
        }
    }

    /// Categories routed right, in ascending order. `None` for continuous splits.
    pub fn right_categories(&self) -> Option<Vec<usize>> {
        match self {
            Split::Continuous { .. } => None,
            Split::Categorical {
                left_categories,
                num_categories,
                ..
            } => Some((0..*num_categories).filter(|c| !left_categories.contains(c)).collect()),
        }
    }

    /// Categories routed left, in ascending order. `None` for continuous splits.
    pub fn sorted_left_categories(&self) -> Option<Vec<usize>> {
        match self {
            Split::Continuous { .. } => None,
            Split::Categorical { left_categories, .. } => {
                let mut cats: Vec<usize> = left_categories.iter().copied().collect();
                cats.sort_unstable();
                Some(cats)
            }
        }
    }

    pub(crate) fn validate(&self, num_features: usize) -> Result<(), TreeError> {
        let feature = self.feature_index();
        if feature >= num_features {
            return Err(TreeError::SplitFeatureOutOfRange(feature, num_features));
        }
        match self {
            Split::Continuous { threshold, .. } => {
                if !threshold.is_finite() {
                    return Err(TreeError::InvalidThreshold(feature, *threshold));
                }
            }
            Split::Categorical {
                left_categories,
                num_categories,
                ..
            } => {
                if let Some(c) = left_categories.iter().find(|c| **c >= *num_categories) {
                    return Err(TreeError::CategoryOutOfRange(feature, *c, *num_categories));
                }
            }
        }
        Ok(())
    }

    /// Condition text for the left (`left == true`) or right branch.
    pub(crate) fn describe(&self, left: bool) -> String {
        match self {
            Split::Continuous {
                feature_index,
                threshold,
            } => {
                let op = if left { "<=" } else { ">" };
                format!("feature {} {} {}", feature_index, op, threshold)
            }
            Split::Categorical { feature_index, .. } => {
                let op = if left { "in" } else { "not in" };
                let cats = self
                    .sorted_left_categories()
                    .unwrap_or_default()
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<String>>()
                    .join(",");
                format!("feature {} {} {{{}}}", feature_index, op, cats)
            }
        }
    }
}

impl Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.describe(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_routing() {
        let split = Split::continuous(0, 0.5);
        assert!(split.should_go_left(0.3));
        assert!(split.should_go_left(0.5));
        assert!(!split.should_go_left(0.7));
        assert!(!split.should_go_left(f64::NAN));
        assert_eq!(split.right_categories(), None);
    }

    #[test]
    fn test_categorical_routing() {
        let split = Split::categorical(2, [1, 3], 5);
        assert!(split.should_go_left(1.0));
        assert!(split.should_go_left(3.0));
        assert!(!split.should_go_left(2.0));
        assert!(!split.should_go_left(1.5));
        assert!(!split.should_go_left(-1.0));
        assert!(!split.should_go_left(f64::NAN));
        assert_eq!(split.right_categories(), Some(vec![0, 2, 4]));
        assert_eq!(split.sorted_left_categories(), Some(vec![1, 3]));
    }

    #[test]
    fn test_validate() {
        assert!(Split::continuous(1, 0.0).validate(2).is_ok());
        assert_eq!(
            Split::continuous(2, 0.0).validate(2),
            Err(TreeError::SplitFeatureOutOfRange(2, 2))
        );
        assert_eq!(
            Split::categorical(0, [4], 3).validate(1),
            Err(TreeError::CategoryOutOfRange(0, 4, 3))
        );
        assert!(matches!(
            Split::continuous(1, f64::NAN).validate(2),
            Err(TreeError::InvalidThreshold(1, t)) if t.is_nan()
        ));
        assert_eq!(
            Split::continuous(0, f64::INFINITY).validate(1),
            Err(TreeError::InvalidThreshold(0, f64::INFINITY))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Split::continuous(0, 0.5).to_string(), "feature 0 <= 0.5");
        assert_eq!(Split::continuous(0, 0.5).describe(false), "feature 0 > 0.5");
        assert_eq!(Split::categorical(1, [3, 1], 4).describe(false), "feature 1 not in {1,3}");
    }
}
