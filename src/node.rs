//! Node
//!
//! Leaf and internal nodes of a trained tree, and the walk from a node to a leaf.
use crate::data::Features;
use crate::errors::TreeError;
use crate::impurity::ImpurityStats;
use crate::split::Split;
use std::fmt::{self, Display};

/// Terminal node carrying a fixed prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub prediction: f64,
    pub stats: ImpurityStats,
}

/// Node that routes a row to one of its two exclusively owned children.
///
/// Children are fixed at construction, so the leaf count of the subtree is
/// stored once and leaf indices can be found in time proportional to depth.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalNode {
    /// Prediction had the tree stopped growing here.
    pub prediction: f64,
    pub stats: ImpurityStats,
    pub split: Split,
    pub(crate) left: Box<Node>,
    pub(crate) right: Box<Node>,
    leaves: usize,
}

impl InternalNode {
    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }

    /// Impurity reduction achieved by this node's split.
    pub fn gain(&self) -> f64 {
        self.stats.gain
    }

    /// The child a row with `value` for the split feature is routed to.
    pub fn child(&self, value: f64) -> &Node {
        if self.split.should_go_left(value) {
            &self.left
        } else {
            &self.right
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl Node {
    pub fn leaf(prediction: f64, stats: ImpurityStats) -> Self {
        Node::Leaf(LeafNode { prediction, stats })
    }

    pub fn internal(prediction: f64, stats: ImpurityStats, split: Split, left: Node, right: Node) -> Self {
        let leaves = left.num_leaves() + right.num_leaves();
        Node::Internal(InternalNode {
            prediction,
            stats,
            split,
            left: Box::new(left),
            right: Box::new(right),
            leaves,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn prediction(&self) -> f64 {
        match self {
            Node::Leaf(n) => n.prediction,
            Node::Internal(n) => n.prediction,
        }
    }

    pub fn stats(&self) -> &ImpurityStats {
        match self {
            Node::Leaf(n) => &n.stats,
            Node::Internal(n) => &n.stats,
        }
    }

    pub fn impurity(&self) -> f64 {
        self.stats().impurity
    }

    /// Walk from this node to the leaf selected by `features`.
    pub fn predict_leaf_node<F>(&self, features: &F) -> Result<&LeafNode, TreeError>
    where
        F: Features + ?Sized,
    {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(leaf) => return Ok(leaf),
                Node::Internal(n) => {
                    node = n.child(features.get_value(n.split.feature_index())?);
                }
            }
        }
    }

    /// Same walk as `predict_leaf_node`, also returning the position of the
    /// reached leaf among all leaves of this subtree, counted left to right.
    pub fn predict_leaf_with_index<F>(&self, features: &F) -> Result<(&LeafNode, usize), TreeError>
    where
        F: Features + ?Sized,
    {
        let mut node = self;
        let mut index = 0;
        loop {
            match node {
                Node::Leaf(leaf) => return Ok((leaf, index)),
                Node::Internal(n) => {
                    if n.split.should_go_left(features.get_value(n.split.feature_index())?) {
                        node = &*n.left;
                    } else {
                        index += n.left.num_leaves();
                        node = &*n.right;
                    }
                }
            }
        }
    }

    /// Number of nodes below this one.
    pub fn num_descendants(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(n) => 2 + n.left.num_descendants() + n.right.num_descendants(),
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(n) => n.leaves,
        }
    }

    /// Depth of the subtree rooted here; a single leaf has depth 0.
    pub fn subtree_depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(n) => 1 + n.left.subtree_depth().max(n.right.subtree_depth()),
        }
    }

    /// Check every split against `num_features` and every node's statistics.
    pub(crate) fn validate(&self, num_features: usize) -> Result<(), TreeError> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.stats().validate()?;
            if let Node::Internal(n) = node {
                n.split.validate(num_features)?;
                stack.push(&n.right);
                stack.push(&n.left);
            }
        }
        Ok(())
    }

    /// Indented if/else rendering of the subtree.
    pub fn subtree_to_string(&self, indent: usize) -> String {
        let prefix = " ".repeat(indent);
        match self {
            Node::Leaf(n) => format!("{}Predict: {}\n", prefix, n.prediction),
            Node::Internal(n) => {
                let mut r = String::new();
                r += format!("{}If ({})\n", prefix, n.split.describe(true)).as_str();
                r += n.left.subtree_to_string(indent + 1).as_str();
                r += format!("{}Else ({})\n", prefix, n.split.describe(false)).as_str();
                r += n.right.subtree_to_string(indent + 1).as_str();
                r
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf(n) => write!(
                f,
                "leaf={},impurity={},count={}",
                n.prediction,
                n.stats.impurity,
                n.stats.weighted_count()
            ),
            Node::Internal(n) => write!(
                f,
                "[{}] prediction={},impurity={},gain={},count={}",
                n.split,
                n.prediction,
                n.stats.impurity,
                n.stats.gain,
                n.stats.weighted_count()
            ),
        }
    }
}
