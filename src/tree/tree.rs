//! Decision Tree Model
//!
//! A validated tree with its feature count, structural queries and memoized importances.
use crate::errors::TreeError;
use crate::node::Node;
use crate::tree::importance::compute_feature_importances;
use log::debug;
use std::fmt::{self, Display};
use std::sync::OnceLock;

/// A trained decision tree, read-only once constructed.
///
/// The tree is validated once in [`DecisionTreeModel::new`], so every split
/// references a feature in `[0, num_features)` and all node statistics are
/// well formed.
#[derive(Debug, Clone)]
pub struct DecisionTreeModel {
    root: Node,
    num_features: usize,
    importances: OnceLock<Vec<f64>>,
}

impl DecisionTreeModel {
    /// Wrap an externally trained tree.
    ///
    /// * `root` - Root node of the tree.
    /// * `num_features` - Number of feature slots the tree was trained against.
    pub fn new(root: Node, num_features: usize) -> Result<Self, TreeError> {
        if num_features == 0 {
            return Err(TreeError::InvalidNumFeatures(num_features));
        }
        root.validate(num_features)?;
        let model = DecisionTreeModel {
            root,
            num_features,
            importances: OnceLock::new(),
        };
        debug!(
            "Loaded decision tree with {} nodes and depth {} over {} features.",
            model.num_nodes(),
            model.depth(),
            model.num_features
        );
        Ok(model)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Depth of the tree; a tree that is a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.subtree_depth()
    }

    pub fn num_nodes(&self) -> usize {
        1 + self.root.num_descendants()
    }

    pub fn num_leaves(&self) -> usize {
        self.root.num_leaves()
    }

    /// Normalized gain-based importance of every feature.
    ///
    /// Computed on first use and cached on the model. Concurrent first calls
    /// may each compute the vector, but only one result is stored and all
    /// callers see the same values.
    pub fn feature_importances(&self) -> Result<&[f64], TreeError> {
        if let Some(importances) = self.importances.get() {
            return Ok(importances);
        }
        let computed = compute_feature_importances(&self.root, self.num_features)?;
        debug!("Computed feature importances over {} features.", computed.len());
        Ok(self.importances.get_or_init(|| computed))
    }

    /// Full if/else rendering of the tree.
    pub fn to_debug_string(&self) -> String {
        self.to_string()
    }
}

impl Display for DecisionTreeModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DecisionTreeModel of depth {} with {} nodes\n{}",
            self.depth(),
            self.num_nodes(),
            self.root.subtree_to_string(2)
        )
    }
}
