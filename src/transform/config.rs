//! Transform Configuration
//!
//! Which output columns a batch transform writes, and how it runs.
use crate::errors::TreeError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_prediction_col() -> Option<String> {
    Some(String::from("prediction"))
}
fn default_variance_col() -> Option<String> {
    None
}
fn default_leaf_col() -> Option<String> {
    None
}
fn default_parallel() -> bool {
    true
}

/// Output columns of [`DecisionTreeModel::transform`](crate::DecisionTreeModel::transform).
///
/// A column is written only when its name is set and non-empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Column receiving the point prediction.
    #[serde(default = "default_prediction_col")]
    pub prediction_col: Option<String>,
    /// Column receiving the leaf impurity as a variance estimate.
    #[serde(default = "default_variance_col")]
    pub variance_col: Option<String>,
    /// Column receiving the index of the reached leaf.
    #[serde(default = "default_leaf_col")]
    pub leaf_col: Option<String>,
    /// Whether rows are processed on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            prediction_col: default_prediction_col(),
            variance_col: default_variance_col(),
            leaf_col: default_leaf_col(),
            parallel: default_parallel(),
        }
    }
}

fn enabled(col: &Option<String>) -> Option<&str> {
    col.as_deref().filter(|c| !c.is_empty())
}

impl TransformConfig {
    /// Set the prediction column, an empty name disables it.
    pub fn set_prediction_col(mut self, name: &str) -> Self {
        self.prediction_col = Some(name.to_string());
        self
    }

    pub fn set_variance_col(mut self, name: &str) -> Self {
        self.variance_col = Some(name.to_string());
        self
    }

    pub fn set_leaf_col(mut self, name: &str) -> Self {
        self.leaf_col = Some(name.to_string());
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn prediction_col(&self) -> Option<&str> {
        enabled(&self.prediction_col)
    }

    pub fn variance_col(&self) -> Option<&str> {
        enabled(&self.variance_col)
    }

    pub fn leaf_col(&self) -> Option<&str> {
        enabled(&self.leaf_col)
    }

    /// Names of all enabled columns, in prediction, variance, leaf order.
    pub fn enabled_columns(&self) -> Vec<&str> {
        [self.prediction_col(), self.variance_col(), self.leaf_col()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Reject two enabled outputs sharing a column name.
    pub fn validate(&self) -> Result<(), TreeError> {
        let cols = self.enabled_columns();
        for (i, c) in cols.iter().enumerate() {
            if cols[..i].contains(c) {
                return Err(TreeError::InvalidParameter(
                    String::from("output columns"),
                    String::from("distinct column names"),
                    format!("duplicate name {}", c),
                ));
            }
        }
        Ok(())
    }
}

/// JSON persistence for transform configurations.
///
/// Column names and the parallel flag are stored as a flat JSON object; missing
/// fields fall back to the `TransformConfig` defaults when read back.
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Write the configuration to `path` as JSON, replacing any existing file.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeError> {
        fs::write(path, self.json_dump()?).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Parse a configuration from JSON text such as the output of `json_dump`.
    fn from_json(json_str: &str) -> Result<Self, TreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))
    }

    /// Read a configuration previously written with `save`.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for TransformConfig {}
