//! Tree Prediction Methods
//!
//! Single-row prediction on nodes and models, plus batch prediction over a matrix.
use super::tree::DecisionTreeModel;
use crate::data::{Features, Matrix};
use crate::errors::TreeError;
use crate::impurity::ImpurityStats;
use crate::node::{LeafNode, Node};
use rayon::prelude::*;

/// Outcome of routing one row to a leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult<'a> {
    /// Prediction stored on the reached leaf.
    pub value: f64,
    /// Statistics of the reached leaf.
    pub stats: &'a ImpurityStats,
}

impl PredictionResult<'_> {
    /// Variance estimate, taken as the impurity of the reached leaf.
    pub fn variance(&self) -> f64 {
        self.stats.calculate()
    }
}

impl<'a> From<&'a LeafNode> for PredictionResult<'a> {
    fn from(leaf: &'a LeafNode) -> Self {
        PredictionResult {
            value: leaf.prediction,
            stats: &leaf.stats,
        }
    }
}

impl Node {
    /// Route `features` from this node to a leaf and report what it holds.
    pub fn predict<F>(&self, features: &F) -> Result<PredictionResult<'_>, TreeError>
    where
        F: Features + ?Sized,
    {
        self.predict_leaf_node(features).map(PredictionResult::from)
    }
}

impl DecisionTreeModel {
    fn check_len<F>(&self, features: &F) -> Result<(), TreeError>
    where
        F: Features + ?Sized,
    {
        if features.len() < self.num_features() {
            Err(TreeError::FeatureIndexOutOfBounds(self.num_features() - 1, features.len()))
        } else {
            Ok(())
        }
    }

    /// Prediction and leaf statistics from a single traversal.
    pub fn predict_node<F>(&self, features: &F) -> Result<PredictionResult<'_>, TreeError>
    where
        F: Features + ?Sized,
    {
        self.check_len(features)?;
        self.root().predict(features)
    }

    /// Point prediction for one row.
    pub fn predict<F>(&self, features: &F) -> Result<f64, TreeError>
    where
        F: Features + ?Sized,
    {
        self.predict_node(features).map(|r| r.value)
    }

    /// Variance estimate for one row: the impurity of the leaf the row reaches.
    pub fn predict_variance<F>(&self, features: &F) -> Result<f64, TreeError>
    where
        F: Features + ?Sized,
    {
        self.predict_node(features).map(|r| r.variance())
    }

    /// Prediction and variance from the same leaf.
    pub fn predict_with_variance<F>(&self, features: &F) -> Result<(f64, f64), TreeError>
    where
        F: Features + ?Sized,
    {
        self.predict_node(features).map(|r| (r.value, r.variance()))
    }

    /// Index of the leaf the row reaches, counting leaves left to right from 0.
    pub fn predict_leaf<F>(&self, features: &F) -> Result<usize, TreeError>
    where
        F: Features + ?Sized,
    {
        self.check_len(features)?;
        self.root().predict_leaf_with_index(features).map(|(_, i)| i)
    }

    fn predict_row(&self, data: &Matrix<f64>, row: usize) -> Result<f64, TreeError> {
        self.predict(data.get_row(row).as_slice())
    }

    fn predict_single_threaded(&self, data: &Matrix<f64>) -> Result<Vec<f64>, TreeError> {
        data.index.iter().map(|i| self.predict_row(data, *i)).collect()
    }

    fn predict_parallel(&self, data: &Matrix<f64>) -> Result<Vec<f64>, TreeError> {
        data.index.par_iter().map(|i| self.predict_row(data, *i)).collect()
    }

    /// Point predictions for every row of `data`.
    pub fn predict_batch(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, TreeError> {
        if data.cols < self.num_features() {
            return Err(TreeError::ColumnMismatch(data.cols, self.num_features()));
        }
        if parallel {
            self.predict_parallel(data)
        } else {
            self.predict_single_threaded(data)
        }
    }
}
