mod node;

// Modules
pub mod data;
pub mod errors;
pub mod impurity;
pub mod split;
pub mod transform;
pub mod tree;

// Individual classes, and functions
pub use data::{FeatureVector, Features, Matrix, SparseVector};
pub use errors::TreeError;
pub use impurity::{ImpurityCalculator, ImpurityStats};
pub use node::{InternalNode, LeafNode, Node};
pub use split::Split;
pub use transform::config::{ConfigIO, TransformConfig};
pub use transform::TransformOutput;
pub use tree::importance::compute_feature_importances;
pub use tree::predict::PredictionResult;
pub use tree::tree::DecisionTreeModel;
