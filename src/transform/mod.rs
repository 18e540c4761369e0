//! Batch Transform
//!
//! Applies a tree to every row of a matrix and writes the configured output
//! columns. Each row is routed once; its prediction, variance and leaf index
//! all come from the same leaf.
pub mod config;

use crate::data::Matrix;
use crate::errors::TreeError;
use crate::tree::tree::DecisionTreeModel;
use config::TransformConfig;
use hashbrown::HashMap;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

/// Named output columns, one value per input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformOutput {
    pub columns: HashMap<String, Vec<f64>>,
}

impl TransformOutput {
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

struct RowOutput {
    prediction: f64,
    variance: f64,
    leaf: usize,
}

impl DecisionTreeModel {
    fn transform_row(&self, data: &Matrix<f64>, row: usize, with_leaf: bool) -> Result<RowOutput, TreeError> {
        let features = data.get_row(row);
        let (leaf, index) = if with_leaf {
            self.root().predict_leaf_with_index(features.as_slice())?
        } else {
            (self.root().predict_leaf_node(features.as_slice())?, 0)
        };
        Ok(RowOutput {
            prediction: leaf.prediction,
            variance: leaf.stats.calculate(),
            leaf: index,
        })
    }

    /// Predict every row of `data`, writing only the columns enabled in `config`.
    ///
    /// With no enabled column nothing is computed and the output is empty.
    pub fn transform(&self, data: &Matrix<f64>, config: &TransformConfig) -> Result<TransformOutput, TreeError> {
        config.validate()?;
        let columns = config.enabled_columns();
        if columns.is_empty() {
            warn!("transform was called as a no-op since no output columns were set.");
            return Ok(TransformOutput::default());
        }
        if data.cols < self.num_features() {
            return Err(TreeError::ColumnMismatch(data.cols, self.num_features()));
        }

        let with_leaf = config.leaf_col().is_some();
        let rows: Vec<RowOutput> = if config.parallel {
            data.index
                .par_iter()
                .map(|i| self.transform_row(data, *i, with_leaf))
                .collect::<Result<_, _>>()?
        } else {
            data.index
                .iter()
                .map(|i| self.transform_row(data, *i, with_leaf))
                .collect::<Result<_, _>>()?
        };

        let mut output = TransformOutput::default();
        if let Some(name) = config.prediction_col() {
            output
                .columns
                .insert(name.to_string(), rows.iter().map(|r| r.prediction).collect());
        }
        if let Some(name) = config.variance_col() {
            output
                .columns
                .insert(name.to_string(), rows.iter().map(|r| r.variance).collect());
        }
        if let Some(name) = config.leaf_col() {
            output
                .columns
                .insert(name.to_string(), rows.iter().map(|r| r.leaf as f64).collect());
        }
        info!(
            "Transformed {} rows into columns [{}].",
            rows.len(),
            columns.join(", ")
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impurity::{ImpurityCalculator, ImpurityStats};
    use crate::node::Node;
    use crate::split::Split;

    fn model() -> DecisionTreeModel {
        let left = Node::leaf(1.0, ImpurityStats::leaf(ImpurityCalculator::variance_from_labels(&[0.0, 2.0])));
        let right = Node::leaf(2.0, ImpurityStats::leaf(ImpurityCalculator::variance_from_labels(&[2.0, 2.0])));
        let root = Node::internal(
            1.5,
            ImpurityStats::new(ImpurityCalculator::variance_from_labels(&[0.0, 2.0, 2.0, 2.0]), 0.25),
            Split::continuous(1, 0.5),
            left,
            right,
        );
        DecisionTreeModel::new(root, 2).unwrap()
    }

    #[test]
    fn test_transform_default_columns() {
        // Columns: [9, 9, 9], [0.1, 0.9, 0.5]
        let data = vec![9.0, 9.0, 9.0, 0.1, 0.9, 0.5];
        let m = Matrix::new(&data, 3, 2);
        let output = model().transform(&m, &TransformConfig::default()).unwrap();
        assert_eq!(output.num_columns(), 1);
        assert_eq!(output.get("prediction"), Some(&[1.0, 2.0, 1.0][..]));
    }

    #[test]
    fn test_transform_all_columns() {
        let data = vec![0.0, 0.0, 0.1, 0.9];
        let m = Matrix::new(&data, 2, 2);
        let config = TransformConfig::default()
            .set_variance_col("variance")
            .set_leaf_col("leaf")
            .set_parallel(false);
        let output = model().transform(&m, &config).unwrap();
        assert_eq!(output.get("prediction"), Some(&[1.0, 2.0][..]));
        assert_eq!(output.get("variance"), Some(&[1.0, 0.0][..]));
        assert_eq!(output.get("leaf"), Some(&[0.0, 1.0][..]));
    }

    #[test]
    fn test_transform_parallel_matches_sequential() {
        let data: Vec<f64> = (0..200).map(|i| (i as f64) / 100.0 - 0.5).collect();
        let m = Matrix::new(&data, 100, 2);
        let config = TransformConfig::default().set_variance_col("variance").set_leaf_col("leaf");
        let tree = model();
        let par = tree.transform(&m, &config).unwrap();
        let seq = tree.transform(&m, &config.clone().set_parallel(false)).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_transform_no_columns() {
        let data = vec![0.0, 0.0];
        let m = Matrix::new(&data, 1, 2);
        let config = TransformConfig::default().set_prediction_col("");
        let output = model().transform(&m, &config).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_transform_column_mismatch() {
        let data = vec![0.0, 0.0];
        let m = Matrix::new(&data, 2, 1);
        assert_eq!(
            model().transform(&m, &TransformConfig::default()),
            Err(TreeError::ColumnMismatch(1, 2))
        );
    }
}
