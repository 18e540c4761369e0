//! Errors
//!
//! Custom error types used throughout the `treeline` crate.
use thiserror::Error;

/// Errors that can occur when reading or evaluating a decision tree.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// A split asked for a feature the supplied vector does not have.
    #[error("Feature index {0} is out of bounds for a feature vector of length {1}.")]
    FeatureIndexOutOfBounds(usize, usize),
    /// A split references a feature outside the range the model was built for.
    #[error("Split on feature {0} is outside the {1} features the model was trained with.")]
    SplitFeatureOutOfRange(usize, usize),
    /// The model must have at least one feature slot.
    #[error("The number of features must be positive, but {0} was provided.")]
    InvalidNumFeatures(usize),
    /// First value is the feature, second the offending category, third the number of categories.
    #[error("Categorical split on feature {0} references category {1}, but the feature has {2} categories.")]
    CategoryOutOfRange(usize, usize, usize),
    /// First value is the feature, second the threshold.
    #[error("Continuous split on feature {0} has non-finite threshold {1}.")]
    InvalidThreshold(usize, f64),
    /// Impurity statistics violate their invariants.
    #[error("Invalid impurity statistics: {0}")]
    InvalidImpurityStats(String),
    /// Sparse vector indices or values are inconsistent.
    #[error("Invalid sparse vector: {0}")]
    InvalidSparseVector(String),
    /// The data has fewer columns than the model needs.
    #[error("Data has {0} columns, but the model expects at least {1}.")]
    ColumnMismatch(usize, usize),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to read configuration.
    #[error("Unable to read configuration {0}")]
    UnableToRead(String),
    /// Unable to write configuration.
    #[error("Unable to write configuration: {0}")]
    UnableToWrite(String),
}
